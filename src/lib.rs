//! Editing core for a hierarchical notation document.
//!
//! The document is a tree (score, staves, bars, notes and triplets) with a
//! handful of id-keyed cross references (second timings, the selection).
//! Everything a frontend needs to edit one lives here:
//!
//! - [`models`]: the document tree and its persisted JSON form
//! - [`selection`]: range selection resolved on demand in canonical order
//! - [`layout`]: pure bar/stave geometry and the id position index
//! - [`history`]: bounded whole-document snapshot undo/redo
//! - [`commands`]: the command enum and the session that dispatches it
//!
//! All mutation flows through [`commands::Session::dispatch`]; the model
//! types keep their invariants (tie validity, triplet shape, no dangling
//! timing references) on every edit that could disturb them.

pub mod commands;
pub mod history;
pub mod layout;
pub mod models;
pub mod selection;
pub mod settings;

pub use commands::{Command, Session, Update};
pub use models::{DocumentError, EditError, Score};
pub use selection::Selection;
pub use settings::Settings;
