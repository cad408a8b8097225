//! Item identity
//!
//! Every addressable item in a score (bar, note, triplet) carries an [`Id`].
//! Ids are opaque: they are compared by equality, and any notion of one item
//! coming "before" another is decided by traversal order, never by the raw
//! value. Uniqueness only needs to hold within one live document - restoring
//! an undo snapshot brings back the ids it was saved with.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token for bars, notes and triplets
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Id(u64);

impl Id {
    /// Allocate an id that has not been handed out before in this process
    pub fn next() -> Self {
        Id(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure future allocations cannot collide with `self`.
    ///
    /// Called for every id encountered while loading a saved score.
    pub fn reserve(self) {
        NEXT_ID.fetch_max(self.0 + 1, Ordering::Relaxed);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Saved scores store ids as opaque decimal strings; very old files stored
// them as raw numbers. Accept both, always write strings.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = Id;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an id string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
                v.parse::<u64>()
                    .map(Id)
                    .map_err(|_| E::custom(format!("invalid id `{v}`")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
                Ok(Id(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
