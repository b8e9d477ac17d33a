// Public API - what other modules can use
pub use cursor::{build_cursor, Cursor};
pub use errors::LeaderboardError;
pub use handlers::{
    add_points, get_leaderboard, get_user, get_user_rank, list_leagues, remove_points,
};
pub use models::{LeaderboardItem, LeaguePage, LeagueSummary, PointsUpdate, UserScoreState};
pub use service::{LeaderboardService, DEFAULT_STORE_TIMEOUT};

// Internal modules
mod cursor;
mod errors;
mod handlers;
pub mod keys;
pub mod models;
mod service;
pub mod types;
