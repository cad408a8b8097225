//! Command dispatch
//!
//! Every mutation of the document goes through `Session::dispatch`, one
//! command at a time. Each command reports back an `Update` saying how much
//! work the caller owes: nothing, a redraw, or a redraw plus a history push
//! and a save. Undo and redo restore whole serialized snapshots rather than
//! replaying inverse edits.

use log::warn;

use crate::history::History;
use crate::layout::PositionIndex;
use crate::models::{
    Bar, Barline, EditError, Gracenote, Id, NoteLength, NoteOrTriplet, Pitch, Score, SingleNote,
    TimeSignature, Timing,
};
use crate::selection::{
    GracenoteSelection, ScoreSelection, Selection, TextSelection, TimingSelection,
    TripletLineSelection,
};

/// What a command did, and what the caller should do about it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Nothing happened
    NoChange,
    /// Re-render; the document itself is unchanged
    ViewChanged,
    /// Re-render, push a history snapshot and persist
    ShouldSave,
    /// Re-render and persist, but no new history entry
    MovedThroughHistory,
}

/// One user request against the document
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SelectNote { note: Id, extend: bool },
    SelectBar { bar: Id, extend: bool },
    SelectGracenote { note: Id },
    SelectTripletLine { triplet: Id },
    ClearSelection,
    ExpandSelection,
    DetractSelection,
    MoveLeft,
    MoveRight,
    DeleteSelection,
    AddNoteAfterSelection { pitch: Pitch },
    SetNoteLength(NoteLength),
    ToggleDot,
    ToggleNatural,
    Tie,
    ToggleTriplet,
    MoveNoteUp,
    MoveNoteDown,
    SetGracenote(Gracenote),
    Copy,
    Paste,
    AddBar { before: bool },
    AddAnacrusis { before: bool },
    SetBarline { front: bool, barline: Barline },
    SetTimeSignature(TimeSignature),
    AddStave { before: bool },
    DeleteStave,
    AddTextBox(String),
    EditTextBox { index: usize, text: String },
    SelectTextBox(usize),
    AddSecondTiming,
    AddSingleTiming,
    SelectTiming(usize),
    EditTimingTexts { index: usize, first: String, second: String },
    StartPreview(NoteLength),
    StopPreview,
    ToggleLandscape,
    SetZoom(f32),
    TogglePageNumbers,
    Undo,
    Redo,
}

/// Pending note input: the length the next added note will take
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preview {
    pub length: NoteLength,
}

/// An entry on the clipboard. Bar breaks remember how the copied notes
/// were distributed so a paste re-crosses bar boundaries the same way.
#[derive(Clone, Debug, PartialEq)]
enum ClipItem {
    Item(NoteOrTriplet),
    BarBreak,
}

/// An open document plus all its transient editing state
pub struct Session {
    score: Score,
    selection: Option<Selection>,
    clipboard: Option<Vec<ClipItem>>,
    preview: Option<Preview>,
    history: History,
    needs_redraw: bool,
}

impl Session {
    pub fn new(score: Score) -> Self {
        let history = match score.to_json() {
            Ok(json) => History::new(json),
            Err(error) => {
                warn!("could not snapshot the opening score: {error}");
                History::default()
            }
        };
        Session {
            score,
            selection: None,
            clipboard: None,
            preview: None,
            history,
            needs_redraw: false,
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn preview(&self) -> Option<Preview> {
        self.preview
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Has anything asked for a redraw since the last call? Requests
    /// coalesce; this returns true at most once per rendering opportunity.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Run one command. The returned signal is also applied here: redraw
    /// latching and the history push both happen before this returns.
    pub fn dispatch(&mut self, command: Command) -> Result<Update, EditError> {
        let update = self.run(command)?;
        match update {
            Update::NoChange => {}
            Update::ViewChanged | Update::MovedThroughHistory => self.needs_redraw = true,
            Update::ShouldSave => {
                self.needs_redraw = true;
                self.commit();
            }
        }
        Ok(update)
    }

    fn commit(&mut self) {
        self.score.update_name();
        match self.score.to_json() {
            Ok(json) => {
                self.history.record(json);
            }
            Err(error) => warn!("could not snapshot the score: {error}"),
        }
    }

    fn run(&mut self, command: Command) -> Result<Update, EditError> {
        match command {
            Command::SelectNote { note, extend } => Ok(self.select(note, extend)),
            Command::SelectBar { bar, extend } => Ok(self.select(bar, extend)),
            Command::SelectGracenote { note } => match self.score.note(note) {
                Some(n) if n.gracenote != Gracenote::None => {
                    self.selection = Some(Selection::Gracenote(GracenoteSelection { note }));
                    Ok(Update::ViewChanged)
                }
                _ => Ok(Update::NoChange),
            },
            Command::SelectTripletLine { triplet } => {
                let exists = self
                    .score
                    .items()
                    .any(|item| matches!(item, NoteOrTriplet::Triplet(t) if t.id == triplet));
                if exists {
                    self.selection =
                        Some(Selection::TripletLine(TripletLineSelection { triplet }));
                    return Ok(Update::ViewChanged);
                }
                Ok(Update::NoChange)
            }
            Command::ClearSelection => {
                self.selection = None;
                Ok(Update::ViewChanged)
            }
            Command::ExpandSelection => {
                if let Some(Selection::Score(selection)) = &mut self.selection {
                    selection.expand(&self.score);
                    return Ok(Update::ViewChanged);
                }
                Ok(Update::NoChange)
            }
            Command::DetractSelection => {
                if let Some(Selection::Score(selection)) = &mut self.selection {
                    selection.detract(&self.score);
                    return Ok(Update::ViewChanged);
                }
                Ok(Update::NoChange)
            }
            Command::MoveLeft => Ok(self.move_selection(false)),
            Command::MoveRight => Ok(self.move_selection(true)),
            Command::DeleteSelection => Ok(self.delete_selection()),
            Command::AddNoteAfterSelection { pitch } => Ok(self.add_note(pitch)),
            Command::SetNoteLength(length) => Ok(self.edit_selected_notes(|note| {
                note.length = length;
            })),
            Command::ToggleDot => Ok(self.edit_selected_notes(|note| {
                note.length = note.length.toggle_dot();
            })),
            Command::ToggleNatural => Ok(self.edit_selected_notes(|note| {
                note.has_natural = !note.has_natural;
            })),
            Command::Tie => Ok(self.tie_selection()),
            Command::ToggleTriplet => Ok(self.toggle_triplet()),
            Command::MoveNoteUp => Ok(self.move_selected(true)),
            Command::MoveNoteDown => Ok(self.move_selected(false)),
            Command::SetGracenote(gracenote) => Ok(self.edit_selected_notes(|note| {
                note.gracenote = gracenote.clone();
            })),
            Command::Copy => Ok(self.copy()),
            Command::Paste => Ok(self.paste()),
            Command::AddBar { before } => Ok(self.add_bar(before, false)),
            Command::AddAnacrusis { before } => Ok(self.add_bar(before, true)),
            Command::SetBarline { front, barline } => Ok(self.set_barline(front, barline)),
            Command::SetTimeSignature(time_signature) => {
                if let Some(Selection::Score(selection)) = &self.selection {
                    self.score
                        .set_time_signature_from(selection.start, time_signature);
                    return Ok(Update::ShouldSave);
                }
                Ok(Update::NoChange)
            }
            Command::AddStave { before } => {
                let beside = self.selected_location().map(|loc| loc.stave);
                self.score.add_stave(beside, before)?;
                Ok(Update::ShouldSave)
            }
            Command::DeleteStave => {
                if let Some(location) = self.selected_location() {
                    self.score.delete_stave(location.stave);
                    self.selection = None;
                    return Ok(Update::ShouldSave);
                }
                Ok(Update::NoChange)
            }
            Command::AddTextBox(text) => {
                self.score.add_text_box(crate::models::TextBox::new(text, false));
                Ok(Update::ShouldSave)
            }
            Command::EditTextBox { index, text } => {
                if let Some(text_box) = self.score.text_boxes_mut().get_mut(index) {
                    text_box.text = text;
                    return Ok(Update::ShouldSave);
                }
                Ok(Update::NoChange)
            }
            Command::SelectTextBox(index) => {
                if index < self.score.text_boxes().len() {
                    self.selection = Some(Selection::Text(TextSelection { index }));
                    return Ok(Update::ViewChanged);
                }
                Ok(Update::NoChange)
            }
            Command::AddSecondTiming => Ok(self.add_timing(true)),
            Command::AddSingleTiming => Ok(self.add_timing(false)),
            Command::SelectTiming(index) => {
                if index < self.score.timings().len() {
                    self.selection = Some(Selection::Timing(TimingSelection { index }));
                    return Ok(Update::ViewChanged);
                }
                Ok(Update::NoChange)
            }
            Command::EditTimingTexts {
                index,
                first,
                second,
            } => match self.score.timings_mut().get_mut(index) {
                Some(timing) => {
                    timing.set_texts(first, second);
                    Ok(Update::ShouldSave)
                }
                None => Ok(Update::NoChange),
            },
            Command::StartPreview(length) => {
                self.preview = Some(Preview { length });
                Ok(Update::ViewChanged)
            }
            Command::StopPreview => {
                self.preview = None;
                Ok(Update::ViewChanged)
            }
            Command::ToggleLandscape => {
                self.score.toggle_landscape();
                Ok(Update::ShouldSave)
            }
            Command::SetZoom(zoom) => {
                self.score.zoom = zoom;
                Ok(Update::ViewChanged)
            }
            Command::TogglePageNumbers => {
                self.score.show_number_of_pages = !self.score.show_number_of_pages;
                Ok(Update::ShouldSave)
            }
            Command::Undo => match self.history.undo() {
                Some(snapshot) => Ok(self.restore(&snapshot)),
                None => Ok(Update::NoChange),
            },
            Command::Redo => match self.history.redo() {
                Some(snapshot) => Ok(self.restore(&snapshot)),
                None => Ok(Update::NoChange),
            },
        }
    }

    // --- selection ---

    fn select(&mut self, id: Id, extend: bool) -> Update {
        if extend {
            if let Some(Selection::Score(selection)) = &self.selection {
                let (start, end) = PositionIndex::of(&self.score).ordered(selection.start, id);
                self.selection = Some(Selection::Score(ScoreSelection::new(start, end)));
                return Update::ViewChanged;
            }
        }
        self.selection = Some(Selection::Score(ScoreSelection::new(id, id)));
        Update::ViewChanged
    }

    fn score_selection(&self) -> Option<ScoreSelection> {
        match &self.selection {
            Some(Selection::Score(selection)) => Some(*selection),
            _ => None,
        }
    }

    fn selected_location(&self) -> Option<crate::models::Location> {
        self.score_selection()
            .and_then(|selection| self.score.location(selection.start))
    }

    fn move_selection(&mut self, forward: bool) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let next = if forward {
            self.score.next_note(selection.end)
        } else {
            self.score.previous_note(selection.start)
        };
        match next {
            Some(id) => {
                self.selection = Some(Selection::Score(ScoreSelection::new(id, id)));
                Update::ViewChanged
            }
            None => Update::NoChange,
        }
    }

    fn delete_selection(&mut self) -> Update {
        let update = match self.selection.take() {
            Some(Selection::Score(selection)) => {
                selection.delete(&mut self.score);
                Update::ShouldSave
            }
            Some(Selection::Gracenote(selection)) => {
                match self.score.note_mut(selection.note) {
                    Some(note) => {
                        note.gracenote = Gracenote::None;
                        Update::ShouldSave
                    }
                    None => Update::NoChange,
                }
            }
            Some(Selection::Text(selection)) => {
                self.score.delete_text_box(selection.index);
                Update::ShouldSave
            }
            Some(Selection::Timing(selection)) => {
                self.score.delete_timing(selection.index);
                Update::ShouldSave
            }
            Some(Selection::TripletLine(selection)) => self.unmake_triplet(selection.triplet),
            None => Update::NoChange,
        };
        update
    }

    // --- note editing ---

    /// Apply `edit` to every selected note, then re-establish ties
    fn edit_selected_notes(&mut self, mut edit: impl FnMut(&mut SingleNote)) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let notes = selection.notes(&self.score);
        if notes.is_empty() {
            return Update::NoChange;
        }
        for id in notes {
            if let Some(note) = self.score.note_mut(id) {
                edit(note);
            }
        }
        self.score.fix_ties();
        Update::ShouldSave
    }

    /// Octave-move the selection. A selected single-pitch gracenote moves
    /// on its own; a score selection moves every enclosed note.
    fn move_selected(&mut self, up: bool) -> Update {
        if let Some(Selection::Gracenote(selection)) = &self.selection {
            let id = selection.note;
            if let Some(note) = self.score.note_mut(id) {
                if let Gracenote::Single { note: pitch } = &mut note.gracenote {
                    *pitch = if up { pitch.up() } else { pitch.down() };
                    return Update::ShouldSave;
                }
            }
            return Update::NoChange;
        }
        if up {
            self.edit_selected_notes(|note| note.move_up())
        } else {
            self.edit_selected_notes(|note| note.move_down())
        }
    }

    fn add_note(&mut self, pitch: Pitch) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let after = selection
            .last_note(&self.score)
            .or_else(|| self.score.bar(selection.end).and_then(|bar| bar.last_note()));
        let Some(location) = self.score.location(after.unwrap_or(selection.end)) else {
            return Update::NoChange;
        };
        let length = self
            .preview
            .map(|preview| preview.length)
            .or_else(|| after.and_then(|id| self.score.note(id)).map(|n| n.length))
            .unwrap_or(NoteLength::Crotchet);

        let note = SingleNote::new(pitch, length);
        let id = note.id;
        self.score.staves_mut()[location.stave].bars_mut()[location.bar].insert_note(after, note);
        self.score.fix_ties();
        self.selection = Some(Selection::Score(ScoreSelection::new(id, id)));
        Update::ShouldSave
    }

    fn tie_selection(&mut self) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let notes = selection.notes(&self.score);
        match notes.as_slice() {
            [] => return Update::NoChange,
            [only] => {
                if let Some(note) = self.score.note_mut(*only) {
                    note.tied = !note.tied;
                }
            }
            // every note except the first selected gets tied back
            [_, rest @ ..] => {
                for &id in rest {
                    if let Some(note) = self.score.note_mut(id) {
                        note.tied = true;
                    }
                }
            }
        }
        self.score.fix_ties();
        Update::ShouldSave
    }

    fn toggle_triplet(&mut self) -> Update {
        if let Some(Selection::TripletLine(selection)) = &self.selection {
            let triplet = selection.triplet;
            self.selection = None;
            return self.unmake_triplet(triplet);
        }
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let notes = selection.notes(&self.score);
        let Some(&first) = notes.first() else {
            return Update::NoChange;
        };
        let Some(location) = self.score.location(first) else {
            return Update::NoChange;
        };
        let bar = &mut self.score.staves_mut()[location.stave].bars_mut()[location.bar];

        // a selection inside an existing triplet splits it
        let enclosing = bar
            .items()
            .iter()
            .find(|item| matches!(item, NoteOrTriplet::Triplet(_)) && item.has_id(first))
            .map(|item| item.id());
        if let Some(triplet) = enclosing {
            if bar.unmake_triplet(triplet) {
                return Update::ShouldSave;
            }
            return Update::NoChange;
        }
        if let [a, b, c] = notes.as_slice() {
            if let Some(triplet) = bar.make_triplet(*a, *b, *c) {
                self.selection = Some(Selection::Score(ScoreSelection::new(triplet, triplet)));
                return Update::ShouldSave;
            }
        }
        Update::NoChange
    }

    fn unmake_triplet(&mut self, triplet: Id) -> Update {
        let Some(location) = self.score.location(triplet) else {
            return Update::NoChange;
        };
        let bar = &mut self.score.staves_mut()[location.stave].bars_mut()[location.bar];
        if bar.unmake_triplet(triplet) {
            Update::ShouldSave
        } else {
            Update::NoChange
        }
    }

    // --- clipboard ---

    fn copy(&mut self) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let notes = selection.notes(&self.score);
        let mut clip = Vec::new();
        for bar in self.score.bars() {
            let items: Vec<NoteOrTriplet> = bar
                .items()
                .iter()
                .filter(|item| item.singles().iter().any(|note| notes.contains(&note.id)))
                .cloned()
                .collect();
            if items.is_empty() {
                continue;
            }
            if !clip.is_empty() {
                clip.push(ClipItem::BarBreak);
            }
            clip.extend(items.into_iter().map(ClipItem::Item));
        }
        if clip.is_empty() {
            return Update::NoChange;
        }
        self.clipboard = Some(clip);
        Update::NoChange
    }

    fn paste(&mut self) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let clip = match &self.clipboard {
            Some(clip) if !clip.is_empty() => clip.clone(),
            _ => return Update::NoChange,
        };
        let mut after = selection
            .last_note(&self.score)
            .or_else(|| self.score.bar(selection.end).and_then(|bar| bar.last_note()));
        let Some(location) = self.score.location(after.unwrap_or(selection.end)) else {
            return Update::NoChange;
        };
        let (mut stave, mut bar) = (location.stave, location.bar);

        let mut last_pasted = None;
        for clip_item in clip {
            match clip_item {
                ClipItem::BarBreak => {
                    // move to the next bar, crossing staves; stop advancing
                    // at the end of the score and keep appending
                    if bar + 1 < self.score.staves()[stave].num_bars() {
                        bar += 1;
                        after = None;
                    } else if stave + 1 < self.score.staves().len() {
                        stave += 1;
                        bar = 0;
                        after = None;
                    }
                }
                ClipItem::Item(item) => {
                    let fresh = item.duplicate();
                    last_pasted = fresh.singles().last().map(|note| note.id);
                    let target = &mut self.score.staves_mut()[stave].bars_mut()[bar];
                    let index = after
                        .and_then(|id| target.items().iter().position(|item| item.has_id(id)))
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    after = last_pasted;
                    target.items_mut().insert(index, fresh);
                }
            }
        }
        self.score.fix_ties();
        if let Some(id) = last_pasted {
            self.selection = Some(Selection::Score(ScoreSelection::new(id, id)));
        }
        Update::ShouldSave
    }

    // --- bars, barlines, timings ---

    fn add_bar(&mut self, before: bool, anacrusis: bool) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let Some(location) = self.score.location(selection.start) else {
            return Update::NoChange;
        };
        let stave = &mut self.score.staves_mut()[location.stave];
        let beside = stave.bars()[location.bar].id;
        let time_signature = stave.bars()[location.bar].time_signature.clone();
        let new_bar = if anacrusis {
            Bar::anacrusis(time_signature)
        } else {
            Bar::new(time_signature)
        };
        stave.insert_bar(new_bar, beside, before);
        Update::ShouldSave
    }

    fn set_barline(&mut self, front: bool, barline: Barline) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        match self.score.bar_mut(selection.start) {
            Some(bar) => {
                bar.set_barline(front, barline);
                Update::ShouldSave
            }
            None => Update::NoChange,
        }
    }

    /// A second timing runs over three consecutive notes from the
    /// selection start; a single timing over two.
    fn add_timing(&mut self, second: bool) -> Update {
        let Some(selection) = self.score_selection() else {
            return Update::NoChange;
        };
        let start = selection.start;
        let timing = if second {
            let Some(middle) = self.score.next_note(start) else {
                return Update::NoChange;
            };
            let Some(end) = self.score.next_note(middle) else {
                return Update::NoChange;
            };
            Timing::second(start, middle, end)
        } else {
            let Some(end) = self.score.next_note(start) else {
                return Update::NoChange;
            };
            Timing::single(start, end)
        };
        self.score.add_timing(timing);
        Update::ShouldSave
    }

    // --- history ---

    fn restore(&mut self, snapshot: &str) -> Update {
        match Score::from_json(snapshot) {
            Ok(mut score) => {
                score.zoom = self.score.zoom;
                self.score = score;
                self.selection = None;
                self.preview = None;
                Update::MovedThroughHistory
            }
            Err(error) => {
                warn!("history snapshot did not parse: {error}");
                Update::NoChange
            }
        }
    }
}
