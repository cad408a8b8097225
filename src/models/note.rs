//! Notes and triplets
//!
//! A bar holds a sequence of items, each either a single note or a triplet
//! of exactly three single notes sharing one duration class. A tie on a
//! note is only meaningful relative to the immediately preceding note in
//! canonical order: edits that break that relationship must clear it (see
//! [`crate::models::score::Score::fix_ties`]).

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::gracenote::Gracenote;
use super::id::Id;
use super::notelength::NoteLength;
use super::pitch::Pitch;

/// A single note
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SingleNote {
    #[serde(default = "Id::next")]
    pub id: Id,
    pub pitch: Pitch,
    pub length: NoteLength,
    pub tied: bool,
    #[serde(default)]
    pub has_natural: bool,
    #[serde(default)]
    pub gracenote: Gracenote,
}

impl SingleNote {
    pub fn new(pitch: Pitch, length: NoteLength) -> Self {
        SingleNote {
            id: Id::next(),
            pitch,
            length,
            tied: false,
            has_natural: false,
            gracenote: Gracenote::None,
        }
    }

    /// A copy with a fresh id, for clipboard paste
    pub fn duplicate(&self) -> Self {
        SingleNote {
            id: Id::next(),
            ..self.clone()
        }
    }

    pub fn move_up(&mut self) {
        self.pitch = self.pitch.up();
    }

    pub fn move_down(&mut self) {
        self.pitch = self.pitch.down();
    }
}

/// A triplet: exactly three single notes under one duration class
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Triplet {
    #[serde(default = "Id::next")]
    pub id: Id,
    pub length: NoteLength,
    pub notes: [SingleNote; 3],
}

impl Triplet {
    pub fn new(length: NoteLength, notes: [SingleNote; 3]) -> Self {
        Triplet {
            id: Id::next(),
            length,
            notes,
        }
    }

    pub fn duplicate(&self) -> Self {
        let [a, b, c] = &self.notes;
        Triplet {
            id: Id::next(),
            length: self.length,
            notes: [a.duplicate(), b.duplicate(), c.duplicate()],
        }
    }
}

/// One item of a bar's note sequence
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "notetype", content = "value", rename_all = "lowercase")]
pub enum NoteOrTriplet {
    Single(SingleNote),
    Triplet(Triplet),
}

impl NoteOrTriplet {
    pub fn id(&self) -> Id {
        match self {
            NoteOrTriplet::Single(note) => note.id,
            NoteOrTriplet::Triplet(triplet) => triplet.id,
        }
    }

    /// Does `id` name this item or, for a triplet, one of its members?
    pub fn has_id(&self, id: Id) -> bool {
        match self {
            NoteOrTriplet::Single(note) => note.id == id,
            NoteOrTriplet::Triplet(triplet) => {
                triplet.id == id || triplet.notes.iter().any(|n| n.id == id)
            }
        }
    }

    /// The single notes of this item, triplet members flattened in order
    pub fn singles(&self) -> Vec<&SingleNote> {
        match self {
            NoteOrTriplet::Single(note) => vec![note],
            NoteOrTriplet::Triplet(triplet) => triplet.notes.iter().collect(),
        }
    }

    pub fn singles_mut(&mut self) -> Vec<&mut SingleNote> {
        match self {
            NoteOrTriplet::Single(note) => vec![note],
            NoteOrTriplet::Triplet(triplet) => triplet.notes.iter_mut().collect(),
        }
    }

    pub fn duplicate(&self) -> Self {
        match self {
            NoteOrTriplet::Single(note) => NoteOrTriplet::Single(note.duplicate()),
            NoteOrTriplet::Triplet(triplet) => NoteOrTriplet::Triplet(triplet.duplicate()),
        }
    }

    pub fn set_length(&mut self, length: NoteLength) {
        match self {
            NoteOrTriplet::Single(note) => note.length = length,
            NoteOrTriplet::Triplet(triplet) => triplet.length = length,
        }
    }

    pub fn toggle_dot(&mut self) {
        match self {
            NoteOrTriplet::Single(note) => note.length = note.length.toggle_dot(),
            NoteOrTriplet::Triplet(triplet) => triplet.length = triplet.length.toggle_dot(),
        }
    }
}

// Deserialization is manual because of a deprecated legacy shape: old saved
// scores put the item's id beside `value` instead of inside it. That shape
// must stay readable indefinitely, normalised on load.
impl<'de> Deserialize<'de> for NoteOrTriplet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Saved {
            notetype: SavedKind,
            #[serde(default)]
            id: Option<Id>,
            value: serde_json::Value,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum SavedKind {
            Single,
            Triplet,
        }

        let saved = Saved::deserialize(deserializer)?;
        match saved.notetype {
            SavedKind::Single => {
                let mut note: SingleNote =
                    serde_json::from_value(saved.value).map_err(de::Error::custom)?;
                if let Some(id) = saved.id {
                    note.id = id;
                }
                Ok(NoteOrTriplet::Single(note))
            }
            SavedKind::Triplet => {
                let mut triplet: Triplet =
                    serde_json::from_value(saved.value).map_err(de::Error::custom)?;
                if let Some(id) = saved.id {
                    triplet.id = id;
                }
                Ok(NoteOrTriplet::Triplet(triplet))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_id() {
        let note = SingleNote::new(Pitch::E, NoteLength::Quaver);
        let item = NoteOrTriplet::Single(note);
        let json = serde_json::to_string(&item).unwrap();
        let back: NoteOrTriplet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_legacy_sibling_id_is_normalised() {
        let json = r#"{
            "notetype": "single",
            "id": "7001",
            "value": {
                "pitch": "A",
                "length": "c",
                "tied": false,
                "gracenote": {"type": "none"}
            }
        }"#;
        let item: NoteOrTriplet = serde_json::from_str(json).unwrap();
        match item {
            NoteOrTriplet::Single(note) => {
                assert_eq!(serde_json::to_string(&note.id).unwrap(), "\"7001\"");
            }
            _ => panic!("expected a single note"),
        }
    }

    #[test]
    fn test_nested_id_wins_over_default() {
        let json = r#"{
            "notetype": "single",
            "value": {
                "id": "42",
                "pitch": "A",
                "length": "c",
                "tied": false,
                "gracenote": {"type": "none"}
            }
        }"#;
        let item: NoteOrTriplet = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&item.id()).unwrap(), "\"42\"");
    }

    #[test]
    fn test_triplet_must_have_three_notes() {
        let json = r#"{
            "notetype": "triplet",
            "value": {
                "id": "9",
                "length": "q",
                "notes": [
                    {"id": "1", "pitch": "A", "length": "q", "tied": false, "gracenote": {"type": "none"}},
                    {"id": "2", "pitch": "B", "length": "q", "tied": false, "gracenote": {"type": "none"}}
                ]
            }
        }"#;
        let res: Result<NoteOrTriplet, _> = serde_json::from_str(json);
        assert!(res.is_err());
    }

    #[test]
    fn test_unknown_notetype_is_a_load_error() {
        let json = r#"{"notetype": "chord", "value": {}}"#;
        let res: Result<NoteOrTriplet, _> = serde_json::from_str(json);
        assert!(res.is_err());
    }

    #[test]
    fn test_duplicate_gets_fresh_ids() {
        let triplet = Triplet::new(
            NoteLength::Quaver,
            [
                SingleNote::new(Pitch::A, NoteLength::Quaver),
                SingleNote::new(Pitch::B, NoteLength::Quaver),
                SingleNote::new(Pitch::C, NoteLength::Quaver),
            ],
        );
        let copy = triplet.duplicate();
        assert_ne!(copy.id, triplet.id);
        for (a, b) in copy.notes.iter().zip(triplet.notes.iter()) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.pitch, b.pitch);
        }
    }
}
