//! Second timings
//!
//! Repeat-with-variant brackets drawn over the score. A timing holds note
//! or bar ids by reference only - it owns nothing. Whenever a referenced
//! item is deleted the timing must be purged in the same edit, so a
//! dangling reference is never observable.

use serde::{Deserialize, Serialize};

use super::id::Id;

/// A repeat timing annotation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "value")]
pub enum Timing {
    /// First/second-time bracket: first ending from `start` to `middle`,
    /// second ending from `middle` to `end`
    #[serde(rename = "second timing", rename_all = "camelCase")]
    Second {
        start: Id,
        middle: Id,
        end: Id,
        first_text: String,
        second_text: String,
    },
    /// Single bracket from `start` to `end`
    #[serde(rename = "single timing")]
    Single { start: Id, end: Id, text: String },
}

impl Timing {
    pub fn second(start: Id, middle: Id, end: Id) -> Self {
        Timing::Second {
            start,
            middle,
            end,
            first_text: "1.".to_string(),
            second_text: "2.".to_string(),
        }
    }

    pub fn single(start: Id, end: Id) -> Self {
        Timing::Single {
            start,
            end,
            text: "2.".to_string(),
        }
    }

    /// Does this timing reference `id`?
    pub fn points_to(&self, id: Id) -> bool {
        match self {
            Timing::Second {
                start, middle, end, ..
            } => *start == id || *middle == id || *end == id,
            Timing::Single { start, end, .. } => *start == id || *end == id,
        }
    }

    pub fn set_texts(&mut self, first: String, second: String) {
        match self {
            Timing::Second {
                first_text,
                second_text,
                ..
            } => {
                *first_text = first;
                *second_text = second;
            }
            Timing::Single { text, .. } => *text = first,
        }
    }
}
