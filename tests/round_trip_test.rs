//! Whole-document persistence tests: round trips, the legacy saved shape,
//! and hard load failures.

use chanter::models::{
    AutoSize, Bar, Barline, Gracenote, NoteLength, Pitch, Score, SingleNote, TimeSignature, Timing,
};

/// A score exercising most of the saved schema at once
fn rich_score() -> Score {
    let mut score = Score::new("Full Schema".to_string(), 2, TimeSignature::new(4, 4));

    {
        let stave = &mut score.staves_mut()[0];
        let first_bar = stave.bars()[0].id;
        let mut pickup = Bar::anacrusis(TimeSignature::new(4, 4));
        pickup.push_note(SingleNote::new(Pitch::E, NoteLength::Quaver));
        stave.insert_bar(pickup, first_bar, true);
    }

    {
        let bar = &mut score.staves_mut()[0].bars_mut()[1];
        bar.width = AutoSize::Fixed(250.0);
        bar.set_barline(true, Barline::Repeat);
        bar.set_barline(false, Barline::End);
        bar.time_signature = TimeSignature::cut_time();

        let mut doubled = SingleNote::new(Pitch::A, NoteLength::Crotchet);
        doubled.gracenote = Gracenote::Reactive {
            grace: chanter::models::ReactivePattern::Doubling,
        };
        bar.push_note(doubled);

        let mut tied = SingleNote::new(Pitch::A, NoteLength::Crotchet);
        tied.tied = true;
        tied.gracenote = Gracenote::Single { note: Pitch::HighG };
        bar.push_note(tied);

        let mut natural = SingleNote::new(Pitch::C, NoteLength::DottedQuaver);
        natural.has_natural = true;
        natural.gracenote = Gracenote::Custom {
            pitches: vec![Pitch::G, Pitch::D, Pitch::G],
        };
        bar.push_note(natural);
    }

    {
        let bar = &mut score.staves_mut()[1].bars_mut()[0];
        for pitch in [Pitch::A, Pitch::B, Pitch::C] {
            bar.push_note(SingleNote::new(pitch, NoteLength::Quaver));
        }
        let ids: Vec<_> = bar.items().iter().map(|item| item.id()).collect();
        bar.make_triplet(ids[0], ids[1], ids[2]).unwrap();
    }

    let ids = score.note_ids();
    score.add_timing(Timing::second(ids[0], ids[1], ids[2]));
    score.add_timing(Timing::single(ids[3], ids[4]));
    score.add_text_box(chanter::models::TextBox::new("arr. anon".to_string(), false));
    score
}

#[test]
fn test_round_trip_preserves_the_whole_document() {
    let score = rich_score();
    let json = score.to_json().unwrap();
    let back = Score::from_json(&json).unwrap();
    assert_eq!(back, score);
}

#[test]
fn test_round_trip_preserves_ids() {
    let score = rich_score();
    let back = Score::from_json(&score.to_json().unwrap()).unwrap();

    assert_eq!(back.note_ids(), score.note_ids());
    let bars: Vec<_> = score.bars().map(|bar| bar.id).collect();
    let back_bars: Vec<_> = back.bars().map(|bar| bar.id).collect();
    assert_eq!(back_bars, bars);
}

#[test]
fn test_timings_survive_a_round_trip() {
    let score = rich_score();
    let back = Score::from_json(&score.to_json().unwrap()).unwrap();
    assert_eq!(back.timings(), score.timings());
    let ids = score.note_ids();
    assert!(back.timings()[0].points_to(ids[1]));
}

const LEGACY_DOCUMENT: &str = r#"{
  "name": "Old Tune",
  "landscape": false,
  "staves": [
    {
      "gap": "auto",
      "bars": [
        {
          "id": 100,
          "isAnacrusis": false,
          "timeSignature": {"ts": "cut time", "breaks": []},
          "notes": [
            {
              "notetype": "single",
              "id": "101",
              "value": {"pitch": "A", "length": "c", "tied": false, "gracenote": {"type": "none"}}
            },
            {
              "notetype": "triplet",
              "id": "102",
              "value": {
                "length": "q",
                "notes": [
                  {"id": "103", "pitch": "A", "length": "q", "tied": false, "gracenote": {"type": "none"}},
                  {"id": "104", "pitch": "B", "length": "q", "tied": false, "gracenote": {"type": "reactive", "value": {"grace": "doubling"}}},
                  {"id": "105", "pitch": "HG", "length": "q", "tied": false, "gracenote": {"type": "none"}}
                ]
              }
            }
          ]
        }
      ]
    }
  ],
  "textBoxPages": [
    {"texts": [{"x": 0.0, "y": 100.0, "size": 20, "text": "Old Tune", "centred": true}]},
    {"texts": [{"x": 5.0, "y": 50.0, "size": 12, "text": "from an old manuscript", "centred": false, "font": "serif"}]}
  ],
  "secondTimings": [
    {
      "type": "second timing",
      "value": {"start": "101", "middle": "103", "end": "105", "firstText": "1.", "secondText": "2."}
    }
  ],
  "showNumberOfPages": true,
  "settings": {"bpm": 80, "staveGap": 100.0, "lineGap": 7.0, "margin": 30.0, "gapAfterGracenote": 7.0}
}"#;

#[test]
fn test_legacy_document_loads_and_normalises() {
    let score = Score::from_json(LEGACY_DOCUMENT).unwrap();

    assert_eq!(score.name, "Old Tune");
    assert_eq!(score.staves().len(), 1);
    assert_eq!(score.note_ids().len(), 4);

    // sibling ids from the legacy note shape were applied
    let items: Vec<_> = score.items().collect();
    assert_eq!(serde_json::to_string(&items[0].id()).unwrap(), "\"101\"");
    assert_eq!(serde_json::to_string(&items[1].id()).unwrap(), "\"102\"");

    // every page's text boxes were flattened into one list
    assert_eq!(score.text_boxes().len(), 2);
    assert_eq!(score.text_boxes()[1].text, "from an old manuscript");

    let first_bar = score.bars().next().unwrap();
    assert_eq!(first_bar.time_signature, TimeSignature::cut_time());
    assert_eq!(score.timings().len(), 1);
}

#[test]
fn test_normalised_form_is_written_back() {
    let score = Score::from_json(LEGACY_DOCUMENT).unwrap();
    let json = score.to_json().unwrap();

    // one page on save, ids inside `value`
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["textBoxPages"].as_array().unwrap().len(), 1);
    let note = &value["staves"][0]["bars"][0]["notes"][0];
    assert!(note.get("id").is_none());
    assert_eq!(note["value"]["id"], "101");

    let back = Score::from_json(&json).unwrap();
    assert_eq!(back, score);
}

#[test]
fn test_unknown_tags_fail_the_whole_load() {
    for (needle, replacement) in [
        // unknown reactive pattern name
        (r#""grace": "doubling""#, r#""grace": "gripp""#),
        // unknown timing kind
        (r#""type": "second timing""#, r#""type": "third timing""#),
        // denominator outside 2/4/8
        (r#""ts": "cut time""#, r#""ts": [3, 16]"#),
        // unknown note kind
        (r#""notetype": "triplet""#, r#""notetype": "chord""#),
    ] {
        let broken = LEGACY_DOCUMENT.replace(needle, replacement);
        assert_ne!(broken, LEGACY_DOCUMENT);
        assert!(
            Score::from_json(&broken).is_err(),
            "expected a load failure after replacing {needle}"
        );
    }
}

#[test]
fn test_unknown_barline_fails_the_load() {
    let broken = LEGACY_DOCUMENT.replace(
        r#""isAnacrusis": false,"#,
        r#""isAnacrusis": false, "frontBarline": {"type": "double"},"#,
    );
    assert!(Score::from_json(&broken).is_err());
}

#[test]
fn test_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tune.json");

    let score = rich_score();
    std::fs::write(&path, score.to_json().unwrap()).unwrap();
    let loaded = Score::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, score);
}
