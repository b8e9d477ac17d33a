use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use tracing::{debug, info, instrument};

use super::{ScoreStore, ScoredMember, StoreCommand, StoreError};

impl From<RedisError> for StoreError {
    fn from(error: RedisError) -> Self {
        if error.is_timeout() {
            StoreError::Timeout
        } else if error.is_io_error()
            || error.is_connection_refusal()
            || error.is_connection_dropped()
        {
            StoreError::Connection(error.to_string())
        } else {
            StoreError::Command(error.to_string())
        }
    }
}

/// Redis-backed ScoreStore
///
/// Counters are plain string keys, ordered sets are sorted sets, and batches
/// run as a MULTI/EXEC pipeline. The connection manager reconnects on its own
/// and is cheap to clone per call.
#[derive(Clone)]
pub struct RedisScoreStore {
    connection: ConnectionManager,
}

impl RedisScoreStore {
    /// Connects and pings once so a bad address fails at startup
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let mut connection = ConnectionManager::new(client).await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut connection)
            .await?;

        info!("Connected to redis");
        Ok(Self { connection })
    }
}

/// Score bound as redis expects it, infinities spelled out
fn score_bound(score: f64) -> String {
    if score == f64::INFINITY {
        "+inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        score.to_string()
    }
}

fn into_scored(pairs: Vec<(String, f64)>) -> Vec<ScoredMember> {
    pairs
        .into_iter()
        .map(|(member, score)| ScoredMember { member, score })
        .collect()
}

#[async_trait]
impl ScoreStore for RedisScoreStore {
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection.get::<_, Option<i64>>(key).await?)
    }

    async fn ordered_set_desc_rank(
        &self,
        set: &str,
        member: &str,
    ) -> Result<Option<u64>, StoreError> {
        let mut connection = self.connection.clone();
        Ok(connection
            .zrevrank::<_, _, Option<u64>>(set, member)
            .await?)
    }

    async fn ordered_set_desc_range_by_score(
        &self,
        set: &str,
        max: f64,
        min: f64,
        count: usize,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        let mut connection = self.connection.clone();
        let pairs: Vec<(String, f64)> = redis::cmd("ZREVRANGEBYSCORE")
            .arg(set)
            .arg(score_bound(max))
            .arg(score_bound(min))
            .arg("WITHSCORES")
            .arg("LIMIT")
            .arg(0)
            .arg(count)
            .query_async(&mut connection)
            .await?;
        Ok(into_scored(pairs))
    }

    async fn ordered_set_desc_range_by_index(
        &self,
        set: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        let mut connection = self.connection.clone();
        let pairs: Vec<(String, f64)> = connection
            .zrevrange_withscores(set, start as isize, stop as isize)
            .await?;
        Ok(into_scored(pairs))
    }

    #[instrument(skip(self, commands), fields(command_count = commands.len()))]
    async fn execute_batch(&self, commands: Vec<StoreCommand>) -> Result<(), StoreError> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for command in &commands {
            match command {
                StoreCommand::SetInt { key, value } => {
                    pipe.set(key, *value).ignore();
                }
                StoreCommand::OrderedSetAdd { set, member, score } => {
                    pipe.zadd(set, member, *score).ignore();
                }
                StoreCommand::OrderedSetRemove { set, member } => {
                    pipe.zrem(set, member).ignore();
                }
            }
        }

        let mut connection = self.connection.clone();
        pipe.query_async::<_, ()>(&mut connection).await?;

        debug!("Batch committed to redis");
        Ok(())
    }
}
