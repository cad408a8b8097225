//! Bars
//!
//! A bar owns an ordered sequence of notes and triplets, a time signature
//! and its two barlines. An anacrusis (pickup) bar is a bar whose width is
//! derived from its own content instead of sharing the stave's bar width.

use serde::{Deserialize, Serialize};

use super::barlines::Barline;
use super::id::Id;
use super::note::{NoteOrTriplet, SingleNote, Triplet};
use super::serde_helpers::AutoSize;
use super::timesig::TimeSignature;

/// A bar (regular or anacrusis)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    #[serde(default = "Id::next")]
    pub id: Id,
    pub is_anacrusis: bool,
    pub time_signature: TimeSignature,
    notes: Vec<NoteOrTriplet>,
    #[serde(default)]
    pub width: AutoSize,
    #[serde(default)]
    pub front_barline: Barline,
    #[serde(default)]
    pub back_barline: Barline,
}

impl Bar {
    pub fn new(time_signature: TimeSignature) -> Self {
        Bar {
            id: Id::next(),
            is_anacrusis: false,
            time_signature,
            notes: Vec::new(),
            width: AutoSize::Auto,
            front_barline: Barline::Normal,
            back_barline: Barline::Normal,
        }
    }

    pub fn anacrusis(time_signature: TimeSignature) -> Self {
        Bar {
            is_anacrusis: true,
            ..Bar::new(time_signature)
        }
    }

    pub fn items(&self) -> &[NoteOrTriplet] {
        &self.notes
    }

    pub fn items_mut(&mut self) -> &mut Vec<NoteOrTriplet> {
        &mut self.notes
    }

    /// Does `id` name a note or triplet (member) in this bar?
    pub fn contains(&self, id: Id) -> bool {
        self.notes.iter().any(|item| item.has_id(id))
    }

    /// Id of the last single note in the bar, if any
    pub fn last_note(&self) -> Option<Id> {
        self.notes
            .last()
            .and_then(|item| item.singles().last().map(|n| n.id))
    }

    /// Insert a note after the item containing `after`, or at the front.
    pub fn insert_note(&mut self, after: Option<Id>, note: SingleNote) {
        let index = after
            .and_then(|id| self.notes.iter().position(|item| item.has_id(id)))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.notes.insert(index, NoteOrTriplet::Single(note));
    }

    pub fn push_note(&mut self, note: SingleNote) {
        self.notes.push(NoteOrTriplet::Single(note));
    }

    /// Delete the item containing `id`.
    ///
    /// Deleting a triplet member removes the whole triplet. Returns every
    /// id that stopped existing, for cross-reference purging.
    pub fn delete_item(&mut self, id: Id) -> Option<Vec<Id>> {
        let index = self.notes.iter().position(|item| item.has_id(id))?;
        let removed = self.notes.remove(index);
        let mut ids = vec![removed.id()];
        if let NoteOrTriplet::Triplet(triplet) = &removed {
            ids.extend(triplet.notes.iter().map(|n| n.id));
        }
        Some(ids)
    }

    /// Collapse three consecutive plain single notes into one triplet.
    ///
    /// The triplet takes the position of the first note and the first
    /// note's duration class; the member notes keep their ids. Returns the
    /// new triplet's id, or None if the three notes are not consecutive
    /// singles in this bar.
    pub fn make_triplet(&mut self, first: Id, second: Id, third: Id) -> Option<Id> {
        let index = self.notes.iter().position(|item| item.has_id(first))?;
        if index + 2 >= self.notes.len() {
            return None;
        }
        let ids_match = matches!(
            (&self.notes[index], &self.notes[index + 1], &self.notes[index + 2]),
            (
                NoteOrTriplet::Single(a),
                NoteOrTriplet::Single(b),
                NoteOrTriplet::Single(c),
            ) if a.id == first && b.id == second && c.id == third
        );
        if !ids_match {
            return None;
        }

        let third = self.notes.remove(index + 2);
        let second = self.notes.remove(index + 1);
        let first = self.notes.remove(index);
        let (a, b, c) = match (first, second, third) {
            (
                NoteOrTriplet::Single(a),
                NoteOrTriplet::Single(b),
                NoteOrTriplet::Single(c),
            ) => (a, b, c),
            _ => unreachable!("checked above"),
        };
        let triplet = Triplet::new(a.length, [a, b, c]);
        let id = triplet.id;
        self.notes.insert(index, NoteOrTriplet::Triplet(triplet));
        Some(id)
    }

    /// Split the triplet containing `id` back into its three single notes,
    /// preserving each member's pitch, length, tie and gracenote.
    pub fn unmake_triplet(&mut self, id: Id) -> bool {
        let index = match self.notes.iter().position(|item| {
            matches!(item, NoteOrTriplet::Triplet(_)) && item.has_id(id)
        }) {
            Some(i) => i,
            None => return false,
        };
        let triplet = match self.notes.remove(index) {
            NoteOrTriplet::Triplet(t) => t,
            _ => unreachable!("checked above"),
        };
        let [a, b, c] = triplet.notes;
        self.notes.insert(index, NoteOrTriplet::Single(c));
        self.notes.insert(index, NoteOrTriplet::Single(b));
        self.notes.insert(index, NoteOrTriplet::Single(a));
        true
    }

    pub fn set_barline(&mut self, front: bool, barline: Barline) {
        if front {
            self.front_barline = barline;
        } else {
            self.back_barline = barline;
        }
    }
}
