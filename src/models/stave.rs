//! Staves
//!
//! A stave owns an ordered run of bars. A new stave starts with four empty
//! regular bars. Time signatures live on bars, not the stave; a new stave
//! copies the signature it was created next to.

use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::id::Id;
use super::serde_helpers::AutoSize;
use super::timesig::TimeSignature;

/// A stave: one horizontal run of bars
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Stave {
    #[serde(default)]
    pub gap: AutoSize,
    bars: Vec<Bar>,
}

impl Stave {
    /// A fresh stave of four empty bars in the given time
    pub fn new(time_signature: TimeSignature) -> Self {
        Stave {
            gap: AutoSize::Auto,
            bars: (0..4).map(|_| Bar::new(time_signature.clone())).collect(),
        }
    }

    /// A stave over an explicit run of bars
    pub fn with_bars(bars: Vec<Bar>) -> Self {
        Stave {
            gap: AutoSize::Auto,
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bars_mut(&mut self) -> &mut [Bar] {
        &mut self.bars
    }

    pub fn num_bars(&self) -> usize {
        self.bars.len()
    }

    pub fn first_bar(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn bar(&self, id: Id) -> Option<&Bar> {
        self.bars.iter().find(|bar| bar.id == id)
    }

    pub fn bar_mut(&mut self, id: Id) -> Option<&mut Bar> {
        self.bars.iter_mut().find(|bar| bar.id == id)
    }

    /// Insert `new_bar` before or after the bar with id `beside`.
    ///
    /// Appends at the end when `beside` is not in this stave.
    pub fn insert_bar(&mut self, new_bar: Bar, beside: Id, before: bool) {
        match self.bars.iter().position(|bar| bar.id == beside) {
            Some(index) => {
                let index = if before { index } else { index + 1 };
                self.bars.insert(index, new_bar);
            }
            None => self.bars.push(new_bar),
        }
    }

    /// Delete the bar with id `id`, returning every id that stopped
    /// existing (the bar and all its notes) for cross-reference purging.
    pub fn delete_bar(&mut self, id: Id) -> Option<Vec<Id>> {
        let index = self.bars.iter().position(|bar| bar.id == id)?;
        let bar = self.bars.remove(index);
        let mut ids = vec![bar.id];
        for item in bar.items() {
            ids.push(item.id());
            for note in item.singles() {
                ids.push(note.id);
            }
        }
        Some(ids)
    }
}
