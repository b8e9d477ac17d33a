use thiserror::Error;

use super::LeagueId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("league id 0 is reserved for \"no league\"")]
    ReservedId,

    #[error("duplicate league id {0}")]
    DuplicateId(LeagueId),

    #[error("league {id} has min {min} greater than max {max}")]
    InvertedRange { id: LeagueId, min: i64, max: i64 },

    #[error("league {first} overlaps league {second}")]
    Overlap { first: LeagueId, second: LeagueId },
}
