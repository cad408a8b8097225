//! Text boxes
//!
//! Free-floating text placed on the score. The text box at index 0 of the
//! score is the title and is kept in sync with the score's name.

use serde::{Deserialize, Serialize};

/// Font choices for a text box
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Font {
    #[default]
    #[serde(rename = "sans-serif")]
    SansSerif,
    #[serde(rename = "serif")]
    Serif,
}

/// A positioned piece of text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub size: u32,
    pub text: String,
    pub centred: bool,
    #[serde(default)]
    pub font: Font,
}

impl TextBox {
    pub fn new(text: String, centred: bool) -> Self {
        TextBox {
            x: 0.0,
            y: 100.0,
            size: if centred { 20 } else { 12 },
            text,
            centred,
            font: Font::SansSerif,
        }
    }

    /// Move the box, clamped to the page.
    pub fn set_coords(&mut self, x: f32, y: f32, page_width: f32, page_height: f32) {
        if x > 0.0 && x < page_width && y > 0.0 && y < page_height {
            self.x = x;
            self.y = y;
            self.centred = false;
        }
    }
}
