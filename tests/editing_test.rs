//! End-to-end editing tests driven through command dispatch.

use chanter::models::{EditError, Id, NoteOrTriplet, Pitch, Score};
use chanter::{Command, Session, Update};

fn select_first_bar(session: &mut Session) {
    let bar = session.score().bars().next().unwrap().id;
    session
        .dispatch(Command::SelectBar { bar, extend: false })
        .unwrap();
}

fn add_notes(session: &mut Session, pitches: &[Pitch]) -> Vec<Id> {
    select_first_bar(session);
    for &pitch in pitches {
        session
            .dispatch(Command::AddNoteAfterSelection { pitch })
            .unwrap();
    }
    session.score().note_ids()
}

fn select_range(session: &mut Session, start: Id, end: Id) {
    session
        .dispatch(Command::SelectNote {
            note: start,
            extend: false,
        })
        .unwrap();
    session
        .dispatch(Command::SelectNote {
            note: end,
            extend: true,
        })
        .unwrap();
}

#[test]
fn test_deleting_a_stave_purges_its_timings() {
    // the default score: two staves of four bars each
    let mut session = Session::new(Score::default());
    assert_eq!(session.score().staves().len(), 2);
    assert_eq!(session.score().bars().count(), 8);

    let ids = add_notes(&mut session, &[Pitch::A, Pitch::B, Pitch::C]);
    select_range(&mut session, ids[0], ids[0]);
    session.dispatch(Command::AddSecondTiming).unwrap();
    assert_eq!(session.score().timings().len(), 1);

    let update = session.dispatch(Command::DeleteStave).unwrap();
    assert_eq!(update, Update::ShouldSave);
    assert_eq!(session.score().staves().len(), 1);
    assert_eq!(session.score().bars().count(), 4);
    assert!(session.score().timings().is_empty());
    assert!(session.score().note_ids().is_empty());
}

#[test]
fn test_triplet_make_and_unmake_through_commands() {
    let mut session = Session::new(Score::default());
    let ids = add_notes(&mut session, &[Pitch::A, Pitch::B, Pitch::C]);

    select_range(&mut session, ids[0], ids[2]);
    let update = session.dispatch(Command::ToggleTriplet).unwrap();
    assert_eq!(update, Update::ShouldSave);
    let items: Vec<_> = session.score().items().collect();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], NoteOrTriplet::Triplet(_)));
    // members kept their ids
    assert_eq!(session.score().note_ids(), ids);

    let update = session.dispatch(Command::ToggleTriplet).unwrap();
    assert_eq!(update, Update::ShouldSave);
    let items: Vec<_> = session.score().items().collect();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| matches!(i, NoteOrTriplet::Single(_))));
    let pitches: Vec<Pitch> = session
        .score()
        .note_ids()
        .iter()
        .map(|&id| session.score().note(id).unwrap().pitch)
        .collect();
    assert_eq!(pitches, vec![Pitch::A, Pitch::B, Pitch::C]);
}

#[test]
fn test_deleting_the_preceding_note_breaks_a_tie() {
    let mut session = Session::new(Score::default());
    let ids = add_notes(&mut session, &[Pitch::A, Pitch::A]);

    select_range(&mut session, ids[1], ids[1]);
    session.dispatch(Command::Tie).unwrap();
    assert!(session.score().note(ids[1]).unwrap().tied);

    select_range(&mut session, ids[0], ids[0]);
    session.dispatch(Command::DeleteSelection).unwrap();
    assert_eq!(session.score().note_ids(), vec![ids[1]]);
    assert!(!session.score().note(ids[1]).unwrap().tied);
}

#[test]
fn test_bar_anchored_delete_keeps_the_end_note_bar() {
    let mut session = Session::new(Score::default());
    let bar_ids: Vec<Id> = session.score().bars().map(|bar| bar.id).collect();
    // one note in the first bar, two in the second
    add_notes(&mut session, &[Pitch::A]);
    session
        .dispatch(Command::SelectBar {
            bar: bar_ids[1],
            extend: false,
        })
        .unwrap();
    session
        .dispatch(Command::AddNoteAfterSelection { pitch: Pitch::B })
        .unwrap();
    session
        .dispatch(Command::AddNoteAfterSelection { pitch: Pitch::C })
        .unwrap();
    let ids = session.score().note_ids();

    // bar-anchored range ending at the second bar's first note
    session
        .dispatch(Command::SelectBar {
            bar: bar_ids[0],
            extend: false,
        })
        .unwrap();
    session
        .dispatch(Command::SelectNote {
            note: ids[1],
            extend: true,
        })
        .unwrap();
    session.dispatch(Command::DeleteSelection).unwrap();

    // the first bar goes; the second keeps its unselected note
    assert_eq!(session.score().bars().count(), 7);
    assert_eq!(session.score().note_ids(), vec![ids[2]]);
}

#[test]
fn test_deleting_a_timing_anchor_purges_the_timing() {
    let mut session = Session::new(Score::default());
    let ids = add_notes(&mut session, &[Pitch::A, Pitch::B, Pitch::C]);
    select_range(&mut session, ids[0], ids[0]);
    session.dispatch(Command::AddSecondTiming).unwrap();

    select_range(&mut session, ids[1], ids[1]);
    session.dispatch(Command::DeleteSelection).unwrap();
    assert!(session.score().timings().is_empty());
}

#[test]
fn test_history_is_bounded_at_thirty_snapshots() {
    let mut session = Session::new(Score::default());
    select_first_bar(&mut session);
    for _ in 0..35 {
        session
            .dispatch(Command::AddNoteAfterSelection { pitch: Pitch::A })
            .unwrap();
    }

    let mut undos = 0;
    while session.dispatch(Command::Undo).unwrap() == Update::MovedThroughHistory {
        undos += 1;
    }
    // 29 steps back from the newest of 30 retained snapshots
    assert_eq!(undos, 29);
    assert_eq!(session.score().note_ids().len(), 35 - 29);
}

#[test]
fn test_an_edit_after_undo_invalidates_redo() {
    let mut session = Session::new(Score::default());
    add_notes(&mut session, &[Pitch::A, Pitch::B]);

    session.dispatch(Command::Undo).unwrap();
    assert!(session.can_redo());

    select_first_bar(&mut session);
    session
        .dispatch(Command::AddNoteAfterSelection { pitch: Pitch::C })
        .unwrap();
    assert!(!session.can_redo());
    assert_eq!(session.dispatch(Command::Redo).unwrap(), Update::NoChange);
}

#[test]
fn test_paste_across_a_bar_break() {
    let mut session = Session::new(Score::default());
    // two notes in the first bar, one in the second
    let first_two = add_notes(&mut session, &[Pitch::A, Pitch::B]);
    let second_bar = session.score().bars().nth(1).unwrap().id;
    session
        .dispatch(Command::SelectBar {
            bar: second_bar,
            extend: false,
        })
        .unwrap();
    session
        .dispatch(Command::AddNoteAfterSelection { pitch: Pitch::C })
        .unwrap();
    let ids = session.score().note_ids();
    assert_eq!(ids.len(), 3);

    select_range(&mut session, first_two[0], ids[2]);
    session.dispatch(Command::Copy).unwrap();

    // paste after the last note: A and B land in bar two, C in bar three
    select_range(&mut session, ids[2], ids[2]);
    session.dispatch(Command::Paste).unwrap();

    let score = session.score();
    assert_eq!(score.note_ids().len(), 6);
    let bars: Vec<_> = score.bars().collect();
    assert_eq!(bars[0].items().len(), 2);
    assert_eq!(bars[1].items().len(), 3);
    assert_eq!(bars[2].items().len(), 1);
    let pitches: Vec<Pitch> = score
        .note_ids()
        .iter()
        .map(|&id| score.note(id).unwrap().pitch)
        .collect();
    assert_eq!(
        pitches,
        vec![Pitch::A, Pitch::B, Pitch::C, Pitch::A, Pitch::B, Pitch::C]
    );
}

#[test]
fn test_adding_staves_stops_when_the_page_is_full() {
    let mut session = Session::new(Score::default());
    let mut added = 0;
    let error = loop {
        match session.dispatch(Command::AddStave { before: false }) {
            Ok(Update::ShouldSave) => added += 1,
            Ok(other) => panic!("unexpected update {other:?}"),
            Err(error) => break error,
        }
    };
    assert_eq!(error, EditError::NotEnoughSpace);
    // the rejected stave was never added
    assert_eq!(session.score().staves().len(), 2 + added);
    assert_eq!(session.score().staves().len(), 12);
}

#[test]
fn test_time_signature_propagates_through_commands() {
    let mut session = Session::new(Score::default());
    let bar_ids: Vec<Id> = session.score().bars().map(|bar| bar.id).collect();
    session
        .dispatch(Command::SelectBar {
            bar: bar_ids[2],
            extend: false,
        })
        .unwrap();
    session
        .dispatch(Command::SetTimeSignature(
            chanter::models::TimeSignature::new(6, 8),
        ))
        .unwrap();

    let tops: Vec<u32> = session
        .score()
        .bars()
        .map(|bar| bar.time_signature.top())
        .collect();
    // every bar from the third onwards carried the old signature
    assert_eq!(tops, vec![2, 2, 6, 6, 6, 6, 6, 6]);
}
