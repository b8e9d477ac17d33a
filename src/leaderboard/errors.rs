use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
