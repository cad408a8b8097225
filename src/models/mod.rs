//! Data model for a notation document
//!
//! Ownership is a strict tree: Score → Stave → Bar → Note/Triplet →
//! Gracenote. Second timings and selections refer into the tree by id only.

pub mod bar;
pub mod barlines;
pub mod gracenote;
pub mod id;
pub mod note;
pub mod notelength;
pub mod pitch;
pub mod score;
pub mod serde_helpers;
pub mod stave;
pub mod textbox;
pub mod timesig;
pub mod timing;

pub use bar::Bar;
pub use barlines::Barline;
pub use gracenote::{Gracenote, ReactivePattern, ResolvedGracenote};
pub use id::Id;
pub use note::{NoteOrTriplet, SingleNote, Triplet};
pub use notelength::NoteLength;
pub use pitch::Pitch;
pub use score::{DocumentError, EditError, Location, Score};
pub use serde_helpers::AutoSize;
pub use stave::Stave;
pub use textbox::{Font, TextBox};
pub use timesig::TimeSignature;
pub use timing::Timing;
