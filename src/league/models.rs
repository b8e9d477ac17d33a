use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type LeagueId = i32;

/// Returned by resolution when no leagues are configured at all.
/// Never a valid tier.
pub const NO_LEAGUE: LeagueId = 0;

/// Locale used when the requested one has no display name
pub const DEFAULT_LOCALE: &str = "en";

/// Upper bound of a league's score range.
///
/// Configuration writes an unbounded league as `max = -1`; any negative
/// value is read as unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LeagueMax {
    Bounded(i64),
    Unbounded,
}

impl From<i64> for LeagueMax {
    fn from(value: i64) -> Self {
        if value < 0 {
            LeagueMax::Unbounded
        } else {
            LeagueMax::Bounded(value)
        }
    }
}

impl From<LeagueMax> for i64 {
    fn from(value: LeagueMax) -> Self {
        match value {
            LeagueMax::Bounded(max) => max,
            LeagueMax::Unbounded => -1,
        }
    }
}

/// A score-range tier. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub min: i64,
    pub max: LeagueMax,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl League {
    /// `max` follows the configuration convention: negative means unbounded
    pub fn new(id: LeagueId, min: i64, max: i64) -> Self {
        Self {
            id,
            min,
            max: LeagueMax::from(max),
            names: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, locale: &str, name: &str) -> Self {
        self.names.insert(locale.to_string(), name.to_string());
        self
    }

    /// Inclusive on both ends; unbounded leagues accept anything at or above `min`
    pub fn contains(&self, points: i64) -> bool {
        match self.max {
            LeagueMax::Bounded(max) => points >= self.min && points <= max,
            LeagueMax::Unbounded => points >= self.min,
        }
    }

    /// Localized name with fallback: requested locale, then "en", then the
    /// first non-empty name by locale key, then "".
    pub fn display_name(&self, locale: &str) -> &str {
        let non_empty = |key: &str| {
            self.names
                .get(key)
                .map(String::as_str)
                .filter(|name| !name.is_empty())
        };

        non_empty(locale)
            .or_else(|| non_empty(DEFAULT_LOCALE))
            .or_else(|| {
                self.names
                    .values()
                    .map(String::as_str)
                    .find(|name| !name.is_empty())
            })
            .unwrap_or("")
    }

    /// Upper bound for overlap checks, `i64::MAX` when unbounded
    pub(crate) fn upper(&self) -> i64 {
        match self.max {
            LeagueMax::Bounded(max) => max,
            LeagueMax::Unbounded => i64::MAX,
        }
    }
}
