use futures::future::try_join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    cursor::Cursor,
    keys::{league_key, user_league_key, user_points_key},
    models::{LeaderboardItem, LeaguePage, LeagueSummary, PointsUpdate, UserScoreState},
    LeaderboardError,
};
use crate::{
    league::{LeagueId, LeagueTable, NO_LEAGUE},
    store::{ScoreStore, ScoredMember, StoreCommand, StoreError},
};

/// Deadline applied to each individual store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Service for score mutation, league migration and ranked reads
///
/// The points counter is the source of truth. League set membership and the
/// recorded league are derived from it and always rewritten together with it.
/// There is no in-process locking: every call goes straight to the store and
/// all serialization is left to the store's batch semantics.
pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
    leagues: Arc<LeagueTable>,
    store_timeout: Duration,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ScoreStore>, leagues: Arc<LeagueTable>) -> Self {
        Self {
            store,
            leagues,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn leagues(&self) -> &LeagueTable {
        &self.leagues
    }

    /// Runs one store call under the service deadline
    async fn call<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, LeaderboardError> {
        match tokio::time::timeout(self.store_timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                warn!(operation, error = %error, "Store call failed");
                Err(error.into())
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(StoreError::Timeout.into())
            }
        }
    }

    /// Applies a signed delta, clamping at zero, and moves the user to the
    /// league matching the new total.
    ///
    /// The initial reads are not part of the write batch. Two concurrent
    /// updates for the same user race: both read the same starting points and
    /// the last batch to commit wins, losing the other delta. Callers needing
    /// strict accounting must serialize updates per user.
    #[instrument(skip(self))]
    pub async fn update_points(
        &self,
        user_id: &str,
        delta: i64,
    ) -> Result<PointsUpdate, LeaderboardError> {
        if user_id.is_empty() {
            return Err(LeaderboardError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }

        let points_key = user_points_key(user_id);
        let recorded_league_key = user_league_key(user_id);

        let current = self
            .call("get_points", self.store.get_int(&points_key))
            .await?
            .unwrap_or(0);
        let points = current.saturating_add(delta).max(0);
        let league_id = self.leagues.resolve(points);

        let previous_league = self
            .call("get_league", self.store.get_int(&recorded_league_key))
            .await?
            .and_then(|raw| LeagueId::try_from(raw).ok())
            .unwrap_or(NO_LEAGUE);

        let mut batch = vec![StoreCommand::SetInt {
            key: points_key,
            value: points,
        }];
        if previous_league != NO_LEAGUE && previous_league != league_id {
            batch.push(StoreCommand::OrderedSetRemove {
                set: league_key(previous_league),
                member: user_id.to_string(),
            });
        }
        if league_id != NO_LEAGUE {
            batch.push(StoreCommand::OrderedSetAdd {
                set: league_key(league_id),
                member: user_id.to_string(),
                score: points as f64,
            });
        }
        batch.push(StoreCommand::SetInt {
            key: recorded_league_key,
            value: i64::from(league_id),
        });

        self.call("update_batch", self.store.execute_batch(batch))
            .await?;

        if previous_league != league_id {
            info!(
                user_id = %user_id,
                from_league = previous_league,
                to_league = league_id,
                points,
                "User moved between leagues"
            );
        } else {
            debug!(user_id = %user_id, league_id, points, "Points updated");
        }

        Ok(PointsUpdate { points, league_id })
    }

    #[instrument(skip(self))]
    pub async fn add_points(
        &self,
        user_id: &str,
        delta: i64,
    ) -> Result<PointsUpdate, LeaderboardError> {
        if delta < 0 {
            return Err(LeaderboardError::InvalidArgument(
                "delta must be positive".to_string(),
            ));
        }
        self.update_points(user_id, delta).await
    }

    #[instrument(skip(self))]
    pub async fn remove_points(
        &self,
        user_id: &str,
        delta: i64,
    ) -> Result<PointsUpdate, LeaderboardError> {
        if delta < 0 {
            return Err(LeaderboardError::InvalidArgument(
                "delta must be positive".to_string(),
            ));
        }
        self.update_points(user_id, -delta).await
    }

    /// 1-based descending rank. A user who never scored and a user recorded
    /// in another league both come back as `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_rank(
        &self,
        league_id: LeagueId,
        user_id: &str,
    ) -> Result<u64, LeaderboardError> {
        let rank = self
            .call(
                "get_rank",
                self.store
                    .ordered_set_desc_rank(&league_key(league_id), user_id),
            )
            .await?;

        match rank {
            Some(rank) => Ok(rank + 1),
            None => Err(LeaderboardError::NotFound(format!(
                "user {user_id} not found in league {league_id}"
            ))),
        }
    }

    /// One page of a league in descending score order.
    ///
    /// Ranks are re-read per item after the range query, so under concurrent
    /// writes they reflect read time rather than the page snapshot. A member
    /// that leaves the league between the two reads is dropped from the page.
    #[instrument(skip(self))]
    pub async fn get_page(
        &self,
        league_id: LeagueId,
        cursor: &str,
        limit: i64,
    ) -> Result<LeaguePage, LeaderboardError> {
        if limit <= 0 {
            return Err(LeaderboardError::InvalidArgument(
                "limit must be > 0".to_string(),
            ));
        }
        let limit = usize::try_from(limit).map_err(|_| {
            LeaderboardError::InvalidArgument("limit out of range".to_string())
        })?;
        let key = league_key(league_id);

        let window = match Cursor::parse(cursor)? {
            None => {
                self.call(
                    "range_by_index",
                    self.store.ordered_set_desc_range_by_index(&key, 0, limit - 1),
                )
                .await?
            }
            Some(cursor) => self.scan_after(&key, &cursor, limit).await?,
        };

        let ranks = try_join_all(window.iter().map(|scored| {
            self.call(
                "get_rank",
                self.store.ordered_set_desc_rank(&key, &scored.member),
            )
        }))
        .await?;

        let items: Vec<LeaderboardItem> = window
            .iter()
            .zip(ranks)
            .filter_map(|(scored, rank)| match rank {
                Some(rank) => Some(LeaderboardItem {
                    user_id: scored.member.clone(),
                    points: scored.score,
                    rank: rank + 1,
                }),
                None => {
                    debug!(user_id = %scored.member, "Member left league during page read");
                    None
                }
            })
            .collect();

        let next_cursor = window
            .last()
            .map(|last| Cursor::new(last.score, last.member.clone()).encode())
            .unwrap_or_default();

        debug!(
            league_id,
            item_count = items.len(),
            has_more = !next_cursor.is_empty(),
            "League page built"
        );

        Ok(LeaguePage { items, next_cursor })
    }

    /// Reads up to `limit` members strictly after the cursor position.
    ///
    /// Members sharing the cursor's score that sort before it were already
    /// delivered and are skipped along with the cursor member itself. With
    /// distinct scores this is a single `limit + 1` read discarding at most
    /// the first result. If the cursor member is gone, nothing is skipped.
    async fn scan_after(
        &self,
        key: &str,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<Vec<ScoredMember>, LeaderboardError> {
        let mut count = limit + 1;
        loop {
            let batch = self
                .call(
                    "range_by_score",
                    self.store.ordered_set_desc_range_by_score(
                        key,
                        cursor.score,
                        f64::NEG_INFINITY,
                        count,
                    ),
                )
                .await?;
            let exhausted = batch.len() < count;
            let tie_run = batch
                .iter()
                .take_while(|scored| scored.score == cursor.score)
                .count();
            let boundary = batch[..tie_run]
                .iter()
                .position(|scored| cursor.matches(scored));

            match boundary {
                Some(position) => {
                    let skip = position + 1;
                    if exhausted || batch.len() - skip >= limit {
                        return Ok(batch.into_iter().skip(skip).take(limit).collect());
                    }
                    count = skip + limit;
                }
                None if exhausted || tie_run < batch.len() => {
                    return Ok(batch.into_iter().take(limit).collect());
                }
                // Whole window is the cursor's tie run and the cursor member
                // has not shown up yet
                None => count = count.saturating_mul(2),
            }
        }
    }

    /// Current points and recorded league for a user
    #[instrument(skip(self))]
    pub async fn user_state(&self, user_id: &str) -> Result<UserScoreState, LeaderboardError> {
        let points = self
            .call("get_points", self.store.get_int(&user_points_key(user_id)))
            .await?
            .unwrap_or(0);
        let league_id = self
            .call("get_league", self.store.get_int(&user_league_key(user_id)))
            .await?
            .and_then(|raw| LeagueId::try_from(raw).ok())
            .unwrap_or(NO_LEAGUE);

        Ok(UserScoreState {
            user_id: user_id.to_string(),
            points,
            league_id,
        })
    }

    /// Configured leagues in resolution order with names for `locale`
    pub fn league_summaries(&self, locale: &str) -> Vec<LeagueSummary> {
        self.leagues
            .leagues()
            .iter()
            .map(|league| LeagueSummary {
                id: league.id,
                min: league.min,
                max: league.max.into(),
                name: league.display_name(locale).to_string(),
            })
            .collect()
    }
}
