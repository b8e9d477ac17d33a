// Public API - what other modules can use
pub use errors::LeagueError;
pub use models::{League, LeagueId, LeagueMax, NO_LEAGUE};
pub use table::LeagueTable;

// Internal modules
mod errors;
pub mod models;
mod table;
