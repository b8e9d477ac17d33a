use std::collections::HashSet;

use super::{League, LeagueError, LeagueId, NO_LEAGUE};

/// Ordered, read-only list of league definitions.
///
/// Order is the configuration order and resolution scans it front to back,
/// so the first matching range wins.
#[derive(Debug, Clone, Default)]
pub struct LeagueTable {
    leagues: Vec<League>,
}

impl LeagueTable {
    pub fn new(leagues: Vec<League>) -> Self {
        Self { leagues }
    }

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }

    pub fn get(&self, league_id: LeagueId) -> Option<&League> {
        self.leagues.iter().find(|league| league.id == league_id)
    }

    pub fn is_configured(&self, league_id: LeagueId) -> bool {
        self.get(league_id).is_some()
    }

    /// League for a score. Falls back to the last configured league when no
    /// range matches, and to `NO_LEAGUE` when the table is empty.
    pub fn resolve(&self, points: i64) -> LeagueId {
        self.leagues
            .iter()
            .find(|league| league.contains(points))
            .or_else(|| self.leagues.last())
            .map(|league| league.id)
            .unwrap_or(NO_LEAGUE)
    }

    /// Localized league name, "" for unknown leagues
    pub fn display_name(&self, league_id: LeagueId, locale: &str) -> String {
        self.get(league_id)
            .map(|league| league.display_name(locale).to_string())
            .unwrap_or_default()
    }

    /// Checks the load-time assumptions resolution relies on: unique non-zero
    /// ids, `min <= max`, and no two ranges sharing a score.
    pub fn validate(&self) -> Result<(), LeagueError> {
        let mut seen = HashSet::new();
        for league in &self.leagues {
            if league.id == NO_LEAGUE {
                return Err(LeagueError::ReservedId);
            }
            if !seen.insert(league.id) {
                return Err(LeagueError::DuplicateId(league.id));
            }
            if league.min > league.upper() {
                return Err(LeagueError::InvertedRange {
                    id: league.id,
                    min: league.min,
                    max: league.upper(),
                });
            }
        }

        for (i, first) in self.leagues.iter().enumerate() {
            for second in &self.leagues[i + 1..] {
                if first.min <= second.upper() && second.min <= first.upper() {
                    return Err(LeagueError::Overlap {
                        first: first.id,
                        second: second.id,
                    });
                }
            }
        }

        Ok(())
    }
}
