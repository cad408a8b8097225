//! The score: the root of the document tree
//!
//! A score owns its staves, text boxes and second timings. Staves own bars,
//! bars own notes. Everything else (timings, selections) refers to items by
//! id only. The score also provides canonical-order traversal: staves in
//! array order, then bars, then notes and triplet members.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;

use super::bar::Bar;
use super::id::Id;
use super::note::{NoteOrTriplet, SingleNote};
use super::stave::Stave;
use super::textbox::TextBox;
use super::timesig::TimeSignature;
use super::timing::Timing;

/// A score failed to load. There is no partial load: either the whole
/// document parses or nothing does.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid score: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A user request was rejected; the document is unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("not enough room on the page to add another stave")]
    NotEnoughSpace,
}

/// Where an item lives: indices of its owning stave and bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub stave: usize,
    pub bar: usize,
}

/// A full notation document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub name: String,
    pub landscape: bool,
    staves: Vec<Stave>,
    #[serde(rename = "textBoxPages", with = "text_box_pages")]
    text_boxes: Vec<TextBox>,
    second_timings: Vec<Timing>,
    pub show_number_of_pages: bool,
    pub settings: Settings,
    /// View scale, a percentage. Not part of the document.
    #[serde(skip, default = "default_zoom")]
    pub zoom: f32,
}

fn default_zoom() -> f32 {
    100.0
}

impl Default for Score {
    fn default() -> Self {
        Score::new("My Tune".to_string(), 2, TimeSignature::default())
    }
}

impl Score {
    pub fn new(name: String, num_staves: usize, time_signature: TimeSignature) -> Self {
        Score {
            staves: (0..num_staves)
                .map(|_| Stave::new(time_signature.clone()))
                .collect(),
            text_boxes: vec![TextBox::new(name.clone(), true)],
            second_timings: Vec::new(),
            name,
            landscape: false,
            show_number_of_pages: true,
            settings: Settings::default(),
            zoom: default_zoom(),
        }
    }

    // --- persistence ---

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a saved score, reserving every id it contains so future
    /// allocations cannot collide with it.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let score: Score = serde_json::from_str(json)?;
        for bar in score.bars() {
            bar.id.reserve();
            for item in bar.items() {
                item.id().reserve();
                for note in item.singles() {
                    note.id.reserve();
                }
            }
        }
        Ok(score)
    }

    // --- page geometry ---

    /// Page width in layout units (A4 at 5 units/mm)
    pub fn width(&self) -> f32 {
        if self.landscape {
            297.0 * 5.0
        } else {
            210.0 * 5.0
        }
    }

    pub fn height(&self) -> f32 {
        if self.landscape {
            210.0 * 5.0
        } else {
            297.0 * 5.0
        }
    }

    pub fn toggle_landscape(&mut self) {
        self.landscape = !self.landscape;
        self.zoom = self.zoom * self.height() / self.width();
    }

    // --- staves ---

    pub fn staves(&self) -> &[Stave] {
        &self.staves
    }

    pub fn staves_mut(&mut self) -> &mut [Stave] {
        &mut self.staves
    }

    /// Add a stave next to `beside` (or at the end), copying the adjacent
    /// bar's time signature. Fails without touching the document when the
    /// page has no vertical room left.
    pub fn add_stave(&mut self, beside: Option<usize>, before: bool) -> Result<(), EditError> {
        let settings = &self.settings;
        let required =
            settings.top_offset + settings.stave_gap * (self.staves.len() + 1) as f32;
        if required > self.height() - settings.margin {
            return Err(EditError::NotEnoughSpace);
        }

        match beside {
            Some(index) if index < self.staves.len() => {
                let adjacent = if before {
                    self.staves[index].first_bar()
                } else {
                    self.staves[index].last_bar()
                };
                let ts = adjacent
                    .map(|bar| bar.time_signature.clone())
                    .unwrap_or_default();
                let at = if before { index } else { index + 1 };
                self.staves.insert(at, Stave::new(ts));
            }
            _ => self.staves.push(Stave::new(TimeSignature::default())),
        }
        Ok(())
    }

    /// Remove the stave at `index`, purging timings that referenced
    /// anything inside it.
    pub fn delete_stave(&mut self, index: usize) {
        if index >= self.staves.len() {
            return;
        }
        let stave = self.staves.remove(index);
        let mut deleted = Vec::new();
        for bar in stave.bars() {
            deleted.push(bar.id);
            for item in bar.items() {
                deleted.push(item.id());
                deleted.extend(item.singles().iter().map(|n| n.id));
            }
        }
        self.purge_timings(&deleted);
    }

    // --- canonical traversal ---

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.staves.iter().flat_map(|stave| stave.bars().iter())
    }

    pub fn items(&self) -> impl Iterator<Item = &NoteOrTriplet> {
        self.bars().flat_map(|bar| bar.items().iter())
    }

    /// Ids of every single note (triplet members flattened), canonical order
    pub fn note_ids(&self) -> Vec<Id> {
        self.items()
            .flat_map(|item| item.singles())
            .map(|note| note.id)
            .collect()
    }

    pub fn note(&self, id: Id) -> Option<&SingleNote> {
        self.items()
            .flat_map(|item| item.singles())
            .find(|note| note.id == id)
    }

    pub fn note_mut(&mut self, id: Id) -> Option<&mut SingleNote> {
        self.staves
            .iter_mut()
            .flat_map(|stave| stave.bars_mut().iter_mut())
            .flat_map(|bar| bar.items_mut().iter_mut())
            .flat_map(|item| item.singles_mut())
            .find(|note| note.id == id)
    }

    pub fn bar(&self, id: Id) -> Option<&Bar> {
        self.bars().find(|bar| bar.id == id)
    }

    pub fn bar_mut(&mut self, id: Id) -> Option<&mut Bar> {
        self.staves
            .iter_mut()
            .flat_map(|stave| stave.bars_mut().iter_mut())
            .find(|bar| bar.id == id)
    }

    /// Id of the single note after `id` in canonical order, crossing bar
    /// and stave boundaries. `id` may name a note, a triplet or a bar (a
    /// bar's "next note" is its first note).
    pub fn next_note(&self, id: Id) -> Option<Id> {
        let mut found = false;
        for bar in self.bars() {
            if bar.id == id {
                found = true;
            }
            for item in bar.items() {
                let whole_item = item.id() == id;
                for note in item.singles() {
                    if found && note.id != id {
                        return Some(note.id);
                    }
                    if note.id == id {
                        found = true;
                    }
                }
                if whole_item {
                    found = true;
                }
            }
        }
        None
    }

    /// Id of the single note before `id` in canonical order
    pub fn previous_note(&self, id: Id) -> Option<Id> {
        let mut previous = None;
        for bar in self.bars() {
            if bar.id == id {
                return previous;
            }
            for item in bar.items() {
                if item.id() == id {
                    return previous;
                }
                for note in item.singles() {
                    if note.id == id {
                        return previous;
                    }
                    previous = Some(note.id);
                }
            }
        }
        None
    }

    /// Find the owning stave and bar of `id`.
    ///
    /// A stale id falls back to the last bar of the last stave rather than
    /// failing: interactive editing must survive a selection that outlived
    /// its referent. Returns None only for a (transient) empty score.
    pub fn location(&self, id: Id) -> Option<Location> {
        for (stave_index, stave) in self.staves.iter().enumerate() {
            for (bar_index, bar) in stave.bars().iter().enumerate() {
                if bar.id == id || bar.contains(id) {
                    return Some(Location {
                        stave: stave_index,
                        bar: bar_index,
                    });
                }
            }
        }
        let stave_index = self.staves.len().checked_sub(1)?;
        let bar_index = self.staves[stave_index].num_bars().checked_sub(1)?;
        warn!("no item with id {id}; falling back to the last bar");
        Some(Location {
            stave: stave_index,
            bar: bar_index,
        })
    }

    // --- structural consistency ---

    /// Clear every tie that no longer has an immediately preceding note of
    /// equal pitch. Called after any pitch- or order-affecting edit.
    pub fn fix_ties(&mut self) {
        let mut previous: Option<crate::models::pitch::Pitch> = None;
        for stave in self.staves.iter_mut() {
            for bar in stave.bars_mut() {
                for item in bar.items_mut() {
                    for note in item.singles_mut() {
                        if note.tied && previous != Some(note.pitch) {
                            note.tied = false;
                        }
                        previous = Some(note.pitch);
                    }
                }
            }
        }
    }

    /// Set a new time signature starting at the bar containing `id`,
    /// propagating forward while following bars carry the old signature.
    pub fn set_time_signature_from(&mut self, id: Id, new: TimeSignature) {
        let old = match self.location(id).and_then(|loc| {
            self.staves
                .get(loc.stave)
                .and_then(|s| s.bars().get(loc.bar))
        }) {
            Some(bar) => bar.time_signature.clone(),
            None => return,
        };

        let mut reached = false;
        for stave in self.staves.iter_mut() {
            for bar in stave.bars_mut() {
                if bar.id == id || bar.contains(id) {
                    reached = true;
                }
                if reached {
                    if bar.time_signature == old {
                        bar.time_signature = new.clone();
                    } else {
                        return;
                    }
                }
            }
        }
    }

    // --- second timings ---

    pub fn timings(&self) -> &[Timing] {
        &self.second_timings
    }

    pub fn timings_mut(&mut self) -> &mut [Timing] {
        &mut self.second_timings
    }

    pub fn add_timing(&mut self, timing: Timing) {
        self.second_timings.push(timing);
    }

    pub fn delete_timing(&mut self, index: usize) {
        if index < self.second_timings.len() {
            self.second_timings.remove(index);
        }
    }

    /// Drop every timing that references any of `deleted`. Runs in the
    /// same edit as the delete, so a dangling timing is never observable.
    pub fn purge_timings(&mut self, deleted: &[Id]) {
        self.second_timings
            .retain(|timing| !deleted.iter().any(|&id| timing.points_to(id)));
    }

    // --- text boxes ---

    pub fn text_boxes(&self) -> &[TextBox] {
        &self.text_boxes
    }

    pub fn text_boxes_mut(&mut self) -> &mut [TextBox] {
        &mut self.text_boxes
    }

    pub fn add_text_box(&mut self, text: TextBox) {
        self.text_boxes.push(text);
    }

    pub fn delete_text_box(&mut self, index: usize) {
        if index < self.text_boxes.len() {
            self.text_boxes.remove(index);
        }
    }

    /// Keep the score's name in sync with the title text box (index 0)
    pub fn update_name(&mut self) {
        if let Some(title) = self.text_boxes.first() {
            self.name = title.text.clone();
        }
    }

    // --- spatial queries ---

    /// Which stave does y-coordinate `y` land on, if any?
    ///
    /// Returns None when `y` lies outside every stave band.
    pub fn coordinate_to_stave(&self, y: f32) -> Option<usize> {
        let settings = &self.settings;
        let offset = y + settings.line_height_of(4.0) - settings.top_offset;
        if offset > 0.0 && offset % settings.stave_gap <= settings.line_height_of(12.0) {
            let index = (offset / settings.stave_gap).floor().max(0.0) as usize;
            if index < self.staves.len() {
                return Some(index);
            }
        }
        None
    }
}

// Text boxes are saved grouped into pages; the live model keeps a flat
// list. One page is written out, any number accepted on load.
mod text_box_pages {
    use super::TextBox;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Page {
        texts: Vec<TextBox>,
    }

    pub fn serialize<S: Serializer>(boxes: &[TextBox], serializer: S) -> Result<S::Ok, S::Error> {
        vec![Page {
            texts: boxes.to_vec(),
        }]
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<TextBox>, D::Error> {
        let pages = Vec::<Page>::deserialize(deserializer)?;
        Ok(pages.into_iter().flat_map(|page| page.texts).collect())
    }
}
