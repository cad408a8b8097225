//! Snapshot undo/redo
//!
//! History is coarse-grained on purpose: every persistent edit pushes a
//! full serialized document. Snapshots are plain JSON strings, so no two
//! history entries can ever share mutable structure, and restoring is just
//! deserializing. The stack is bounded; the oldest snapshots fall off.

/// How many snapshots to keep
pub const MAX_HISTORY: usize = 30;

/// Bounded undo (`past`) and redo (`future`) stacks.
///
/// The top of `past` is always the current document state, so `past` must
/// be seeded with the initial snapshot before any edit.
#[derive(Debug, Default)]
pub struct History {
    past: Vec<String>,
    future: Vec<String>,
}

impl History {
    pub fn new(initial: String) -> Self {
        History {
            past: vec![initial],
            future: Vec::new(),
        }
    }

    /// Record a new current state.
    ///
    /// A snapshot equal to the current top is dropped (a no-op edit must
    /// not pollute history). Any real push discards the redo stack: there
    /// is no branching history. Returns whether a push happened.
    pub fn record(&mut self, snapshot: String) -> bool {
        if self.past.last() == Some(&snapshot) {
            return false;
        }
        self.past.push(snapshot);
        if self.past.len() > MAX_HISTORY {
            self.past.remove(0);
        }
        self.future.clear();
        true
    }

    /// Step back, returning the snapshot to restore. The state stepped
    /// away from moves to the redo stack.
    pub fn undo(&mut self) -> Option<String> {
        if self.past.len() < 2 {
            return None;
        }
        let current = self.past.pop()?;
        self.future.push(current);
        self.past.last().cloned()
    }

    /// Step forward again, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<String> {
        let next = self.future.pop()?;
        self.past.push(next.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with_edits(n: usize) -> History {
        let mut history = History::new("s0".to_string());
        for i in 1..=n {
            history.record(format!("s{i}"));
        }
        history
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut history = history_with_edits(2);
        assert_eq!(history.undo(), Some("s1".to_string()));
        assert_eq!(history.undo(), Some("s0".to_string()));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_redo_mirrors_undo() {
        let mut history = history_with_edits(2);
        history.undo();
        assert_eq!(history.redo(), Some("s2".to_string()));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_duplicate_snapshot_is_not_pushed() {
        let mut history = history_with_edits(1);
        assert!(!history.record("s1".to_string()));
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn test_new_edit_after_undo_clears_redo() {
        let mut history = history_with_edits(2);
        history.undo();
        assert!(history.can_redo());
        history.record("s3".to_string());
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = history_with_edits(50);
        assert_eq!(history.past_len(), MAX_HISTORY);

        // 31 undos from a full stack stop at the oldest retained snapshot
        let mut undone = 0;
        while history.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY - 1);
        assert_eq!(history.past_len(), 1);
    }
}
