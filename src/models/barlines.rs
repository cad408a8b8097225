//! Barline markers
//!
//! Barlines may be:
//! - normal (a single vertical line)
//! - repeat (a thick line with dots)
//! - end (a thick line only)

use serde::{Deserialize, Serialize};

/// Front or back barline of a bar
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Barline {
    #[default]
    Normal,
    Repeat,
    End,
}
