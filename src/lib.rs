// Library crate for the league leaderboard service
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod leaderboard;
pub mod league;
pub mod shared;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use leaderboard::{LeaderboardError, LeaderboardService, LeaguePage, PointsUpdate};
pub use league::{League, LeagueTable, NO_LEAGUE};
pub use shared::{AppError, AppState};
pub use store::{InMemoryScoreStore, RedisScoreStore, ScoreStore};

/// HTTP routes over the leaderboard service
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/leagues", get(leaderboard::list_leagues))
        .route(
            "/league/:league_id/leaderboard",
            get(leaderboard::get_leaderboard),
        )
        .route(
            "/league/:league_id/user/:user_id/rank",
            get(leaderboard::get_user_rank),
        )
        .route("/user/:user_id", get(leaderboard::get_user))
        .route("/user/:user_id/points/add", post(leaderboard::add_points))
        .route(
            "/user/:user_id/points/remove",
            post(leaderboard::remove_points),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
