//! Tagged travel-time outcome shared by the cache, scorer and ranker.
//!
//! "No route" is an explicit variant rather than a numeric sentinel so it
//! survives serialization (infinity is not representable in JSON) and cannot
//! silently corrupt downstream arithmetic.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Outcome of a travel-time lookup for one (origin, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelTime {
    /// A transit route exists, with its duration in seconds.
    Reachable(u32),
    /// The provider confirmed no transit route exists.
    Unreachable,
}

impl TravelTime {
    /// Duration in seconds, if a route exists.
    pub fn seconds(self) -> Option<u32> {
        match self {
            TravelTime::Reachable(secs) => Some(secs),
            TravelTime::Unreachable => None,
        }
    }
}

// Persisted as the duration in seconds, with `null` for unreachable.
impl Serialize for TravelTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.seconds().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TravelTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = Option::<u32>::deserialize(deserializer)?;
        Ok(secs.map_or(TravelTime::Unreachable, TravelTime::Reachable))
    }
}
