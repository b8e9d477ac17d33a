use crate::league::LeagueId;

pub fn league_key(league_id: LeagueId) -> String {
    format!("league:{}:lb", league_id)
}

pub fn user_points_key(user_id: &str) -> String {
    format!("user:{}:points", user_id)
}

pub fn user_league_key(user_id: &str) -> String {
    format!("user:{}:league", user_id)
}
