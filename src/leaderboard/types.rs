use serde::{Deserialize, Serialize};

use crate::league::LeagueId;

use super::models::{LeaderboardItem, LeagueSummary};

pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Query string for the league leaderboard endpoint
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub cursor: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub items: Vec<LeaderboardItem>,
    pub next_cursor: String,
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub user_id: String,
    pub league: LeagueId,
    pub rank: u64,
}

/// Request payload for adding or removing points
#[derive(Debug, Deserialize)]
pub struct PointsRequest {
    pub delta: i64,
}

/// Response for point mutations and user lookups
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPointsResponse {
    pub user_id: String,
    pub points: i64,
    pub league: LeagueId,
}

#[derive(Debug, Deserialize)]
pub struct LeaguesQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<LeagueSummary>,
}
