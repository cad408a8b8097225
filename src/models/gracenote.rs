//! Gracenotes
//!
//! A gracenote is attached to exactly one note. It is either absent, a
//! single pitch, a custom pitch list, or "reactive": a named embellishment
//! whose pitches are a deterministic function of the note it sits on and
//! the note before it. Reactive resolution never fails - combinations the
//! pattern does not cover come back as an explicit invalid result carrying
//! the best-effort pitches, which the renderer shows degraded.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::pitch::Pitch;

/// A gracenote attached to a single note
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Gracenote {
    #[default]
    None,
    Single {
        note: Pitch,
    },
    Reactive {
        grace: ReactivePattern,
    },
    Custom {
        pitches: Vec<Pitch>,
    },
}

/// Named embellishment patterns.
///
/// The set is closed: an unknown name in a saved score is a load error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ReactivePattern {
    Doubling,
    HalfDoubling,
    ThrowD,
    Grip,
    Birl,
    Shake,
    Toarluath,
    Edre,
}

/// Outcome of resolving a gracenote to concrete pitches.
///
/// `valid == false` means the pattern had no entry for this pitch context;
/// the pitches are still the best available rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGracenote {
    pub pitches: Vec<Pitch>,
    pub valid: bool,
}

impl ResolvedGracenote {
    fn valid(pitches: Vec<Pitch>) -> Self {
        ResolvedGracenote {
            pitches,
            valid: true,
        }
    }

    fn invalid(pitches: Vec<Pitch>) -> Self {
        ResolvedGracenote {
            pitches,
            valid: false,
        }
    }
}

type PatternFn = fn(Pitch, Option<Pitch>) -> ResolvedGracenote;

static PATTERNS: Lazy<HashMap<ReactivePattern, PatternFn>> = Lazy::new(|| {
    let mut table: HashMap<ReactivePattern, PatternFn> = HashMap::new();
    table.insert(ReactivePattern::Doubling, doubling);
    table.insert(ReactivePattern::HalfDoubling, half_doubling);
    table.insert(ReactivePattern::ThrowD, throw_d);
    table.insert(ReactivePattern::Grip, grip);
    table.insert(ReactivePattern::Birl, birl);
    table.insert(ReactivePattern::Shake, shake);
    table.insert(ReactivePattern::Toarluath, toarluath);
    table.insert(ReactivePattern::Edre, edre);
    table
});

impl Gracenote {
    /// Resolve to concrete pitches for rendering and playback.
    ///
    /// `note` is the pitch of the note this gracenote sits on, `previous`
    /// the pitch of the canonically preceding note, if any.
    pub fn resolve(&self, note: Pitch, previous: Option<Pitch>) -> ResolvedGracenote {
        match self {
            Gracenote::None => ResolvedGracenote::valid(Vec::new()),
            Gracenote::Single { note } => ResolvedGracenote::valid(vec![*note]),
            Gracenote::Custom { pitches } => ResolvedGracenote::valid(pitches.clone()),
            Gracenote::Reactive { grace } => PATTERNS[grace](note, previous),
        }
    }
}

fn doubling(note: Pitch, _previous: Option<Pitch>) -> ResolvedGracenote {
    match note {
        Pitch::HighA => ResolvedGracenote::invalid(vec![Pitch::HighA]),
        Pitch::HighG => ResolvedGracenote::valid(vec![Pitch::HighG, Pitch::F]),
        p => ResolvedGracenote::valid(vec![Pitch::HighG, p, p.up()]),
    }
}

fn half_doubling(note: Pitch, _previous: Option<Pitch>) -> ResolvedGracenote {
    match note {
        Pitch::HighG | Pitch::HighA => ResolvedGracenote::invalid(vec![note]),
        p => ResolvedGracenote::valid(vec![p, p.up()]),
    }
}

fn throw_d(note: Pitch, _previous: Option<Pitch>) -> ResolvedGracenote {
    let pitches = vec![Pitch::G, Pitch::D, Pitch::C];
    if note == Pitch::D {
        ResolvedGracenote::valid(pitches)
    } else {
        ResolvedGracenote::invalid(pitches)
    }
}

fn grip(_note: Pitch, previous: Option<Pitch>) -> ResolvedGracenote {
    if previous == Some(Pitch::D) {
        ResolvedGracenote::valid(vec![Pitch::G, Pitch::B, Pitch::G])
    } else {
        ResolvedGracenote::valid(vec![Pitch::G, Pitch::D, Pitch::G])
    }
}

fn birl(note: Pitch, previous: Option<Pitch>) -> ResolvedGracenote {
    if note != Pitch::A {
        return ResolvedGracenote::invalid(vec![Pitch::G, Pitch::A, Pitch::G]);
    }
    if previous == Some(Pitch::A) {
        ResolvedGracenote::valid(vec![Pitch::G, Pitch::A, Pitch::G])
    } else {
        ResolvedGracenote::valid(vec![Pitch::A, Pitch::G, Pitch::A, Pitch::G])
    }
}

fn shake(note: Pitch, _previous: Option<Pitch>) -> ResolvedGracenote {
    match note {
        Pitch::HighG | Pitch::HighA => ResolvedGracenote::invalid(vec![note]),
        p => ResolvedGracenote::valid(vec![Pitch::HighG, p, p.up(), p, Pitch::G]),
    }
}

fn toarluath(_note: Pitch, previous: Option<Pitch>) -> ResolvedGracenote {
    if previous == Some(Pitch::D) {
        ResolvedGracenote::valid(vec![Pitch::G, Pitch::B, Pitch::G, Pitch::E])
    } else {
        ResolvedGracenote::valid(vec![Pitch::G, Pitch::D, Pitch::G, Pitch::E])
    }
}

fn edre(_note: Pitch, _previous: Option<Pitch>) -> ResolvedGracenote {
    ResolvedGracenote::valid(vec![Pitch::E, Pitch::A, Pitch::F, Pitch::A])
}
