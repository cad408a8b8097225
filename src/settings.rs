//! Document-wide engraving settings
//!
//! These are saved with the score (apart from the fixed top offset) and
//! feed directly into layout computation.

use serde::{Deserialize, Serialize};

/// Width of the treble clef drawn at the start of every stave.
pub const CLEF_WIDTH: f32 = 40.0;

/// Engraving settings for a score
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Playback tempo in beats per minute
    pub bpm: u32,

    /// Vertical distance between consecutive stave tops
    pub stave_gap: f32,

    /// Vertical distance between adjacent stave lines
    pub line_gap: f32,

    /// Page margin
    pub margin: f32,

    /// Horizontal gap left after a gracenote before its note
    pub gap_after_gracenote: f32,

    /// Y coordinate of the first stave (not saved)
    #[serde(skip, default = "default_top_offset")]
    pub top_offset: f32,
}

fn default_top_offset() -> f32 {
    200.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: 80,
            stave_gap: 100.0,
            line_gap: 7.0,
            margin: 30.0,
            gap_after_gracenote: 7.0,
            top_offset: default_top_offset(),
        }
    }
}

impl Settings {
    /// Height of `n` stave line gaps
    pub fn line_height_of(&self, n: f32) -> f32 {
        n * self.line_gap
    }
}
