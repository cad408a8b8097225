//! Layout and position index
//!
//! Everything here is a pure function of the current document shape; no
//! geometry is stored on the model. The renderer uses the same numbers, but
//! the editing core needs them too: normalising a drag's two endpoints into
//! (start, end) and hit-testing a coordinate against a stave both depend on
//! where things are.

use std::collections::HashMap;

use crate::models::{AutoSize, Bar, Id, NoteOrTriplet, Score, Stave};
use crate::settings::{Settings, CLEF_WIDTH};

/// Fixed lead-in of an anacrusis bar before its first note
const ANACRUSIS_PAD: f32 = 15.0;

/// Horizontal space per crotchet beat inside an anacrusis
const BEAT_SPACE: f32 = 15.0;

/// Computed horizontal extent of one bar
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    pub id: Id,
    pub x: f32,
    pub width: f32,
}

/// An anacrusis is sized by its own contents, duration-weighted, never by
/// the stave's shared bar width.
pub fn anacrusis_width(bar: &Bar) -> f32 {
    let beats: f32 = bar
        .items()
        .iter()
        .flat_map(|item| item.singles())
        .map(|note| note.length.in_beats())
        .sum();
    ANACRUSIS_PAD + BEAT_SPACE * beats
}

/// Bar geometry for one stave of total width `stave_width`.
///
/// The clef takes a fixed allowance at the left; anacruses and
/// user-pinned widths come off the top; whatever remains is shared equally
/// between the auto-width regular bars.
pub fn stave_geometry(stave: &Stave, stave_width: f32) -> Vec<BarGeometry> {
    let mut claimed = 0.0;
    let mut auto_bars = 0usize;
    for bar in stave.bars() {
        if bar.is_anacrusis {
            claimed += anacrusis_width(bar);
        } else if let AutoSize::Fixed(width) = bar.width {
            claimed += width;
        } else {
            auto_bars += 1;
        }
    }
    let shared = if auto_bars > 0 {
        (stave_width - CLEF_WIDTH - claimed) / auto_bars as f32
    } else {
        0.0
    };

    let mut x = CLEF_WIDTH;
    stave
        .bars()
        .iter()
        .map(|bar| {
            let width = if bar.is_anacrusis {
                anacrusis_width(bar)
            } else if let AutoSize::Fixed(width) = bar.width {
                width
            } else {
                shared
            };
            let geometry = BarGeometry {
                id: bar.id,
                x,
                width,
            };
            x += width;
            geometry
        })
        .collect()
}

/// Top y coordinate of stave `index`
pub fn stave_y(settings: &Settings, index: usize) -> f32 {
    settings.top_offset + index as f32 * settings.stave_gap
}

/// Page index of a y coordinate; pages are not stored anywhere
pub fn page_of(y: f32, page_height: f32) -> usize {
    (y / page_height).floor().max(0.0) as usize
}

/// Where an item sits, for ordering and selection drawing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub page: usize,
    pub y: f32,
    pub before_x: f32,
    pub after_x: f32,
}

/// Does `a` come before `b` on the page? Page first, then y, then x.
pub fn before(a: &Position, b: &Position) -> bool {
    if a.page != b.page {
        return a.page < b.page;
    }
    if a.y != b.y {
        return a.y < b.y;
    }
    a.before_x < b.before_x
}

/// Positions of every bar, note and triplet, built in one traversal
#[derive(Debug, Default)]
pub struct PositionIndex {
    positions: HashMap<Id, Position>,
}

impl PositionIndex {
    pub fn of(score: &Score) -> Self {
        let settings = &score.settings;
        let stave_width = score.width() - 2.0 * settings.margin;
        let page_height = score.height();
        let mut positions = HashMap::new();

        for (stave_index, stave) in score.staves().iter().enumerate() {
            let y = stave_y(settings, stave_index);
            let page = page_of(y, page_height);
            for (bar, geometry) in stave.bars().iter().zip(stave_geometry(stave, stave_width)) {
                let x = settings.margin + geometry.x;
                positions.insert(
                    bar.id,
                    Position {
                        page,
                        y,
                        before_x: x,
                        after_x: x + geometry.width,
                    },
                );

                // single notes spread evenly through the bar
                let count = bar
                    .items()
                    .iter()
                    .map(|item| item.singles().len())
                    .sum::<usize>();
                let slot = geometry.width / (count as f32 + 1.0);
                let mut note_index = 0usize;
                for item in bar.items() {
                    let mut first_x = None;
                    let mut last_x = 0.0;
                    for note in item.singles() {
                        let centre = x + (note_index as f32 + 1.0) * slot;
                        positions.insert(
                            note.id,
                            Position {
                                page,
                                y,
                                before_x: centre - slot / 2.0,
                                after_x: centre + slot / 2.0,
                            },
                        );
                        first_x.get_or_insert(centre - slot / 2.0);
                        last_x = centre + slot / 2.0;
                        note_index += 1;
                    }
                    if let NoteOrTriplet::Triplet(triplet) = item {
                        if let Some(before_x) = first_x {
                            positions.insert(
                                triplet.id,
                                Position {
                                    page,
                                    y,
                                    before_x,
                                    after_x: last_x,
                                },
                            );
                        }
                    }
                }
            }
        }
        PositionIndex { positions }
    }

    pub fn get(&self, id: Id) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Normalise two drag endpoints into document order (start, end).
    ///
    /// Ids the index does not know keep the order they were given in.
    pub fn ordered(&self, a: Id, b: Id) -> (Id, Id) {
        match (self.positions.get(&a), self.positions.get(&b)) {
            (Some(pa), Some(pb)) if before(pb, pa) => (b, a),
            _ => (a, b),
        }
    }
}
