// Public API - what other modules can use
pub use memory::InMemoryScoreStore;
pub use redis_store::RedisScoreStore;

// Internal modules
mod memory;
mod redis_store;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store command error: {0}")]
    Command(String),

    #[error("Store call timed out")]
    Timeout,
}

/// A member of an ordered set together with its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

/// A mutation that can be grouped into a batch
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    SetInt {
        key: String,
        value: i64,
    },
    OrderedSetAdd {
        set: String,
        member: String,
        score: f64,
    },
    OrderedSetRemove {
        set: String,
        member: String,
    },
}

/// Ordered key-value store with sorted-set semantics.
///
/// Descending queries order by score, highest first. Ties follow the store's
/// own member ordering. `execute_batch` must apply every command or none, and
/// readers must never observe a partially applied batch.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// `None` when the key has never been written
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// 0-based position in descending order, `None` when not a member
    async fn ordered_set_desc_rank(&self, set: &str, member: &str)
        -> Result<Option<u64>, StoreError>;

    /// Members with `min <= score <= max`, highest first, at most `count` of them
    async fn ordered_set_desc_range_by_score(
        &self,
        set: &str,
        max: f64,
        min: f64,
        count: usize,
    ) -> Result<Vec<ScoredMember>, StoreError>;

    /// Members at descending positions `start..=stop`
    async fn ordered_set_desc_range_by_index(
        &self,
        set: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<ScoredMember>, StoreError>;

    async fn execute_batch(&self, commands: Vec<StoreCommand>) -> Result<(), StoreError>;

    async fn set_int(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.execute_batch(vec![StoreCommand::SetInt {
            key: key.to_string(),
            value,
        }])
        .await
    }

    async fn ordered_set_add(&self, set: &str, member: &str, score: f64) -> Result<(), StoreError> {
        self.execute_batch(vec![StoreCommand::OrderedSetAdd {
            set: set.to_string(),
            member: member.to_string(),
            score,
        }])
        .await
    }

    async fn ordered_set_remove(&self, set: &str, member: &str) -> Result<(), StoreError> {
        self.execute_batch(vec![StoreCommand::OrderedSetRemove {
            set: set.to_string(),
            member: member.to_string(),
        }])
        .await
    }
}
