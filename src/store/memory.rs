use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{ScoreStore, ScoredMember, StoreCommand, StoreError};

/// Sort key of an ordered set entry: score first, member breaks ties
#[derive(Debug, Clone)]
struct Entry {
    score: f64,
    member: String,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.member.cmp(&other.member))
    }
}

#[derive(Debug, Default)]
struct OrderedSet {
    scores: HashMap<String, f64>,
    entries: BTreeSet<Entry>,
}

impl OrderedSet {
    fn add(&mut self, member: &str, score: f64) {
        self.remove(member);
        self.scores.insert(member.to_string(), score);
        self.entries.insert(Entry {
            score,
            member: member.to_string(),
        });
    }

    fn remove(&mut self, member: &str) {
        if let Some(score) = self.scores.remove(member) {
            self.entries.remove(&Entry {
                score,
                member: member.to_string(),
            });
        }
    }

    fn desc_rank(&self, member: &str) -> Option<u64> {
        let score = *self.scores.get(member)?;
        let entry = Entry {
            score,
            member: member.to_string(),
        };
        let above = self
            .entries
            .range((Bound::Excluded(entry), Bound::Unbounded))
            .count();
        Some(above as u64)
    }

    fn descending(&self) -> impl Iterator<Item = ScoredMember> + '_ {
        self.entries
            .iter()
            .rev()
            .map(|entry| ScoredMember::new(entry.member.clone(), entry.score))
    }
}

#[derive(Debug, Default)]
struct StoreState {
    counters: HashMap<String, i64>,
    sets: HashMap<String, OrderedSet>,
}

/// In-memory implementation of ScoreStore for development and testing
///
/// Ties inside an ordered set are ordered by member, so descending reads
/// return equal scores in reverse lexicographic member order. Data is lost
/// when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    state: RwLock<StoreState>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call, useful for exercising deadlines
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// While set, every call fails with a connection error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Members of an ordered set, highest score first
    pub async fn members(&self, set: &str) -> Vec<ScoredMember> {
        let state = self.state.read().await;
        state
            .sets
            .get(set)
            .map(|ordered| ordered.descending().collect())
            .unwrap_or_default()
    }

    /// Names of all non-empty ordered sets containing `member`
    pub async fn sets_containing(&self, member: &str) -> Vec<String> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state
            .sets
            .iter()
            .filter(|(_, ordered)| ordered.scores.contains_key(member))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    async fn check_available(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            warn!("In-memory store marked unavailable");
            return Err(StoreError::Connection(
                "in-memory store unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state.counters.get(key).copied())
    }

    async fn ordered_set_desc_rank(
        &self,
        set: &str,
        member: &str,
    ) -> Result<Option<u64>, StoreError> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state
            .sets
            .get(set)
            .and_then(|ordered| ordered.desc_rank(member)))
    }

    async fn ordered_set_desc_range_by_score(
        &self,
        set: &str,
        max: f64,
        min: f64,
        count: usize,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        self.check_available().await?;
        let state = self.state.read().await;
        let Some(ordered) = state.sets.get(set) else {
            return Ok(Vec::new());
        };

        Ok(ordered
            .descending()
            .skip_while(|scored| scored.score > max)
            .take_while(|scored| scored.score >= min)
            .take(count)
            .collect())
    }

    async fn ordered_set_desc_range_by_index(
        &self,
        set: &str,
        start: usize,
        stop: usize,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        self.check_available().await?;
        if stop < start {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        let Some(ordered) = state.sets.get(set) else {
            return Ok(Vec::new());
        };

        Ok(ordered
            .descending()
            .skip(start)
            .take(stop - start + 1)
            .collect())
    }

    #[instrument(skip(self, commands), fields(command_count = commands.len()))]
    async fn execute_batch(&self, commands: Vec<StoreCommand>) -> Result<(), StoreError> {
        self.check_available().await?;

        // Single write guard for the whole batch keeps it atomic for readers
        let mut state = self.state.write().await;
        for command in commands {
            match command {
                StoreCommand::SetInt { key, value } => {
                    state.counters.insert(key, value);
                }
                StoreCommand::OrderedSetAdd { set, member, score } => {
                    state.sets.entry(set).or_default().add(&member, score);
                }
                StoreCommand::OrderedSetRemove { set, member } => {
                    let now_empty = match state.sets.get_mut(&set) {
                        Some(ordered) => {
                            ordered.remove(&member);
                            ordered.scores.is_empty()
                        }
                        None => false,
                    };
                    if now_empty {
                        state.sets.remove(&set);
                    }
                }
            }
        }

        debug!("Batch applied in memory");
        Ok(())
    }
}
