use serde::{Deserialize, Serialize};

use crate::league::LeagueId;

/// One row of a league page. `rank` is 1-based and read live, so it can
/// disagree with the row's position if the set changed mid-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardItem {
    pub user_id: String,
    pub points: f64,
    pub rank: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaguePage {
    pub items: Vec<LeaderboardItem>,
    /// Empty once the end of the league is reached
    pub next_cursor: String,
}

/// Outcome of a score mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsUpdate {
    pub points: i64,
    pub league_id: LeagueId,
}

/// Points and recorded league of a user as currently stored.
/// Users who never scored read as 0 points in `NO_LEAGUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScoreState {
    pub user_id: String,
    pub points: i64,
    pub league_id: LeagueId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub id: LeagueId,
    pub min: i64,
    /// -1 when unbounded
    pub max: i64,
    pub name: String,
}
