//! Time signatures
//!
//! Saved as either a `[top, bottom]` pair (bottom restricted to 2, 4 or 8)
//! or one of the named signatures `"cut time"` / `"common time"`. Anything
//! else is a hard load failure.

use serde::{Deserialize, Serialize};

/// A per-bar time signature
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SavedTimeSignature", into = "SavedTimeSignature")]
pub struct TimeSignature {
    ts: Ts,
    /// Beat-grouping break points, in quaver counts
    breaks: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Ts {
    Normal(u32, u32),
    CutTime,
    CommonTime,
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::new(2, 4)
    }
}

impl TimeSignature {
    /// Create a normal signature. The denominator is clamped to 2, 4 or 8.
    pub fn new(top: u32, bottom: u32) -> Self {
        let bottom = match bottom {
            2 | 4 | 8 => bottom,
            _ => 4,
        };
        TimeSignature {
            ts: Ts::Normal(top, bottom),
            breaks: Vec::new(),
        }
    }

    pub fn cut_time() -> Self {
        TimeSignature {
            ts: Ts::CutTime,
            breaks: Vec::new(),
        }
    }

    pub fn common_time() -> Self {
        TimeSignature {
            ts: Ts::CommonTime,
            breaks: Vec::new(),
        }
    }

    pub fn top(&self) -> u32 {
        match self.ts {
            Ts::Normal(top, _) => top,
            Ts::CutTime => 2,
            Ts::CommonTime => 4,
        }
    }

    pub fn bottom(&self) -> u32 {
        match self.ts {
            Ts::Normal(_, bottom) => bottom,
            Ts::CutTime => 2,
            Ts::CommonTime => 4,
        }
    }

    /// Crotchet beats in a full bar of this signature
    pub fn beats_in_bar(&self) -> f32 {
        self.top() as f32 * 4.0 / self.bottom() as f32
    }
}

// --- saved form ---

#[derive(Serialize, Deserialize, Clone)]
struct SavedTimeSignature {
    ts: SavedTs,
    breaks: Vec<u32>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(untagged)]
enum SavedTs {
    Named(String),
    Pair([u32; 2]),
}

impl TryFrom<SavedTimeSignature> for TimeSignature {
    type Error = String;

    fn try_from(saved: SavedTimeSignature) -> Result<Self, Self::Error> {
        let ts = match saved.ts {
            SavedTs::Named(name) => match name.as_str() {
                "cut time" => Ts::CutTime,
                "common time" => Ts::CommonTime,
                other => return Err(format!("unrecognised time signature `{other}`")),
            },
            SavedTs::Pair([top, bottom]) => match bottom {
                2 | 4 | 8 => Ts::Normal(top, bottom),
                other => return Err(format!("invalid time signature denominator {other}")),
            },
        };
        Ok(TimeSignature {
            ts,
            breaks: saved.breaks,
        })
    }
}

impl From<TimeSignature> for SavedTimeSignature {
    fn from(sig: TimeSignature) -> Self {
        let ts = match sig.ts {
            Ts::Normal(top, bottom) => SavedTs::Pair([top, bottom]),
            Ts::CutTime => SavedTs::Named("cut time".to_string()),
            Ts::CommonTime => SavedTs::Named("common time".to_string()),
        };
        SavedTimeSignature {
            ts,
            breaks: sig.breaks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_round_trip() {
        let sig = TimeSignature::new(6, 8);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, r#"{"ts":[6,8],"breaks":[]}"#);
        let back: TimeSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_named_round_trip() {
        let sig = TimeSignature::cut_time();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, r#"{"ts":"cut time","breaks":[]}"#);
        let back: TimeSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_bad_denominator_is_a_load_error() {
        let res: Result<TimeSignature, _> =
            serde_json::from_str(r#"{"ts":[3,16],"breaks":[]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_unknown_name_is_a_load_error() {
        let res: Result<TimeSignature, _> =
            serde_json::from_str(r#"{"ts":"waltz time","breaks":[]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_beats_in_bar() {
        assert_eq!(TimeSignature::new(6, 8).beats_in_bar(), 3.0);
        assert_eq!(TimeSignature::common_time().beats_in_bar(), 4.0);
        assert_eq!(TimeSignature::cut_time().beats_in_bar(), 4.0);
    }
}
