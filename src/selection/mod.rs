//! Selection
//!
//! At most one selection is active at a time, expressed as a tagged union
//! over the kinds of thing that can be selected. A score selection stores
//! only its two endpoint ids; membership is re-resolved on every query by
//! scanning the document in canonical order, so structural edits can never
//! leave a selection holding stale interior state.

use crate::models::{Id, Pitch, Score};

/// The active selection, if any
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Score(ScoreSelection),
    Gracenote(GracenoteSelection),
    Text(TextSelection),
    Timing(TimingSelection),
    TripletLine(TripletLineSelection),
}

/// A range over notes and bars, endpoints inclusive.
///
/// `start` and `end` may each name a note, a triplet or a bar. When an
/// endpoint names a bar, the whole bar is enclosed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSelection {
    pub start: Id,
    pub end: Id,
}

/// The gracenote attached to one note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GracenoteSelection {
    pub note: Id,
}

/// A text box, by index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSelection {
    pub index: usize,
}

/// A second timing, by index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingSelection {
    pub index: usize,
}

/// The bracket over a triplet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripletLineSelection {
    pub triplet: Id,
}

impl ScoreSelection {
    pub fn new(start: Id, end: Id) -> Self {
        ScoreSelection { start, end }
    }

    /// Scan canonical order from `start` to `end`, collecting the enclosed
    /// single-note ids and the ids of wholly enclosed bars.
    fn scan(&self, score: &Score) -> (Vec<Id>, Vec<Id>) {
        let mut notes = Vec::new();
        let mut bars = Vec::new();
        let mut active = false;
        let mut done = false;

        for bar in score.bars() {
            if done {
                break;
            }
            if bar.id == self.start {
                active = true;
            }
            let enclosed_from_entry = active;
            let bar_is_end = bar.id == self.end;

            for item in bar.items() {
                if item.id() == self.start {
                    active = true;
                }
                // end naming a triplet encloses all its members; end naming
                // a member stops at that member
                let whole_item_end = item.id() == self.end;
                for note in item.singles() {
                    if note.id == self.start {
                        active = true;
                    }
                    if active {
                        notes.push(note.id);
                    }
                    if active && note.id == self.end && !bar_is_end && !whole_item_end {
                        done = true;
                        break;
                    }
                }
                if active && whole_item_end && !bar_is_end {
                    done = true;
                }
                if done {
                    break;
                }
            }
            // a bar the selection only reaches into is not enclosed: its
            // remaining notes must survive a bar-anchored delete
            if enclosed_from_entry && !done {
                bars.push(bar.id);
            }
            if bar_is_end && active {
                done = true;
            }
        }
        (notes, bars)
    }

    /// Ids of every enclosed single note, canonical order
    pub fn notes(&self, score: &Score) -> Vec<Id> {
        self.scan(score).0
    }

    /// Ids of every bar the selection encloses in full. A bar the range
    /// ends inside, at a note, is not included.
    pub fn bars(&self, score: &Score) -> Vec<Id> {
        self.scan(score).1
    }

    /// The last enclosed note, where an insertion would go
    pub fn last_note(&self, score: &Score) -> Option<Id> {
        self.notes(score).last().copied()
    }

    /// Grow the selection by one note. Only `end` moves.
    pub fn expand(&mut self, score: &Score) {
        if let Some(next) = score.next_note(self.end) {
            self.end = next;
        }
    }

    /// Shrink the selection by one note. `end` never crosses `start`.
    pub fn detract(&mut self, score: &Score) {
        if self.start == self.end {
            return;
        }
        if let Some(previous) = score.previous_note(self.end) {
            self.end = previous;
        }
    }

    /// Drag the selection onto a pitch: every enclosed note takes that
    /// pitch. Ties are recomputed since neighbouring pitches changed.
    pub fn drag_over_pitch(&self, pitch: Pitch, score: &mut Score) {
        for id in self.notes(score) {
            if let Some(note) = score.note_mut(id) {
                note.pitch = pitch;
                note.has_natural = false;
            }
        }
        score.fix_ties();
    }

    /// Delete everything the selection encloses.
    ///
    /// Enclosed notes always go. When the selection was started on a bar,
    /// wholly enclosed bars go too (a bar the range merely reaches into
    /// keeps its unselected notes), and a stave left with no bars goes
    /// with them. Timings referencing anything deleted are purged in the
    /// same edit.
    pub fn delete(&self, score: &mut Score) {
        let (note_ids, bar_ids) = self.scan(score);
        let started_on_bar = score.bar(self.start).is_some();
        let mut dead = Vec::new();

        for stave in score.staves_mut() {
            for bar in stave.bars_mut() {
                for &id in &note_ids {
                    if let Some(ids) = bar.delete_item(id) {
                        dead.extend(ids);
                    }
                }
            }
        }

        if started_on_bar {
            for stave in score.staves_mut() {
                for &id in &bar_ids {
                    if let Some(ids) = stave.delete_bar(id) {
                        dead.extend(ids);
                    }
                }
            }
            let empty: Vec<usize> = score
                .staves()
                .iter()
                .enumerate()
                .filter(|(_, stave)| stave.num_bars() == 0)
                .map(|(index, _)| index)
                .collect();
            for index in empty.into_iter().rev() {
                score.delete_stave(index);
            }
        }

        score.purge_timings(&dead);
        score.fix_ties();
    }
}
