//! The nine-note Great Highland Bagpipe scale
//!
//! Low G up to High A. Octave moves saturate at the ends of the chanter's
//! range rather than wrapping or failing.

use serde::{Deserialize, Serialize};

/// A chanter pitch, lowest to highest
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pitch {
    G,
    A,
    B,
    C,
    D,
    E,
    F,
    #[serde(rename = "HG")]
    HighG,
    #[serde(rename = "HA")]
    HighA,
}

impl Pitch {
    /// The pitch one scale step up, saturating at High A
    pub fn up(self) -> Pitch {
        use Pitch::*;
        match self {
            G => A,
            A => B,
            B => C,
            C => D,
            D => E,
            E => F,
            F => HighG,
            HighG => HighA,
            HighA => HighA,
        }
    }

    /// The pitch one scale step down, saturating at Low G
    pub fn down(self) -> Pitch {
        use Pitch::*;
        match self {
            G => G,
            A => G,
            B => A,
            C => B,
            D => C,
            E => D,
            F => E,
            HighG => F,
            HighA => HighG,
        }
    }
}
