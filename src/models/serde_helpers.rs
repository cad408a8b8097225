//! Shared serde shapes for the saved-score format

use serde::{Deserialize, Serialize};

/// A dimension that is either computed at layout time or pinned by the user.
///
/// Saved as the string `"auto"` or a bare number.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SavedAutoSize", into = "SavedAutoSize")]
pub enum AutoSize {
    #[default]
    Auto,
    Fixed(f32),
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(untagged)]
enum SavedAutoSize {
    Named(String),
    Number(f32),
}

impl TryFrom<SavedAutoSize> for AutoSize {
    type Error = String;

    fn try_from(saved: SavedAutoSize) -> Result<Self, Self::Error> {
        match saved {
            SavedAutoSize::Named(s) if s == "auto" => Ok(AutoSize::Auto),
            SavedAutoSize::Named(s) => Err(format!("unrecognised size `{s}`")),
            SavedAutoSize::Number(n) => Ok(AutoSize::Fixed(n)),
        }
    }
}

impl From<AutoSize> for SavedAutoSize {
    fn from(size: AutoSize) -> Self {
        match size {
            AutoSize::Auto => SavedAutoSize::Named("auto".to_string()),
            AutoSize::Fixed(n) => SavedAutoSize::Number(n),
        }
    }
}
