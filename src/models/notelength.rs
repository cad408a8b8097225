//! Note durations
//!
//! Lengths are an enum rather than a number so that the saved format stays
//! closed; beat arithmetic (used for anacrusis widths and playback) derives
//! from the variant.

use serde::{Deserialize, Serialize};

/// Duration of a note, dotted-capable
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLength {
    #[serde(rename = "sb")]
    Semibreve,
    #[serde(rename = "m")]
    Minim,
    #[serde(rename = "dm")]
    DottedMinim,
    #[serde(rename = "c")]
    Crotchet,
    #[serde(rename = "dc")]
    DottedCrotchet,
    #[serde(rename = "q")]
    Quaver,
    #[serde(rename = "dq")]
    DottedQuaver,
    #[serde(rename = "sq")]
    SemiQuaver,
    #[serde(rename = "dsq")]
    DottedSemiQuaver,
    #[serde(rename = "ssq")]
    DemiSemiQuaver,
    #[serde(rename = "dssq")]
    DottedDemiSemiQuaver,
    #[serde(rename = "hdsq")]
    HemiDemiSemiQuaver,
    #[serde(rename = "dhdsq")]
    DottedHemiDemiSemiQuaver,
}

impl NoteLength {
    /// Duration in crotchet beats
    pub fn in_beats(self) -> f32 {
        use NoteLength::*;
        match self {
            Semibreve => 4.0,
            Minim => 2.0,
            DottedMinim => 3.0,
            Crotchet => 1.0,
            DottedCrotchet => 1.5,
            Quaver => 0.5,
            DottedQuaver => 0.75,
            SemiQuaver => 0.25,
            DottedSemiQuaver => 0.375,
            DemiSemiQuaver => 0.125,
            DottedDemiSemiQuaver => 0.1875,
            HemiDemiSemiQuaver => 0.0625,
            DottedHemiDemiSemiQuaver => 0.09375,
        }
    }

    /// Is this a dotted length?
    pub fn has_dot(self) -> bool {
        use NoteLength::*;
        matches!(
            self,
            DottedMinim
                | DottedCrotchet
                | DottedQuaver
                | DottedSemiQuaver
                | DottedDemiSemiQuaver
                | DottedHemiDemiSemiQuaver
        )
    }

    /// Toggle the dot, keeping the base duration.
    ///
    /// A semibreve has no dotted form and is returned unchanged.
    pub fn toggle_dot(self) -> NoteLength {
        use NoteLength::*;
        match self {
            Semibreve => Semibreve,
            Minim => DottedMinim,
            DottedMinim => Minim,
            Crotchet => DottedCrotchet,
            DottedCrotchet => Crotchet,
            Quaver => DottedQuaver,
            DottedQuaver => Quaver,
            SemiQuaver => DottedSemiQuaver,
            DottedSemiQuaver => SemiQuaver,
            DemiSemiQuaver => DottedDemiSemiQuaver,
            DottedDemiSemiQuaver => DemiSemiQuaver,
            HemiDemiSemiQuaver => DottedHemiDemiSemiQuaver,
            DottedHemiDemiSemiQuaver => HemiDemiSemiQuaver,
        }
    }
}
