use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::league::{League, LeagueError, LeagueTable};
use crate::leaderboard::DEFAULT_STORE_TIMEOUT;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_LEAGUES_PATH: &str = "leagues.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read league file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse league file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid league table: {0}")]
    InvalidLeagues(#[from] LeagueError),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Process configuration, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http_addr: String,
    pub redis_url: String,
    pub leagues_path: PathBuf,
    pub store_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LeagueFile {
    #[serde(default)]
    leagues: Vec<League>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_timeout = match lookup("LEADERBOARD_STORE_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidVar {
                    name: "LEADERBOARD_STORE_TIMEOUT_MS",
                    value: raw,
                })?,
            None => DEFAULT_STORE_TIMEOUT,
        };

        Ok(Self {
            http_addr: lookup("LEADERBOARD_HTTP_ADDR")
                .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            leagues_path: lookup("LEADERBOARD_LEAGUES_PATH")
                .unwrap_or_else(|| DEFAULT_LEAGUES_PATH.to_string())
                .into(),
            store_timeout,
        })
    }

    /// Reads and validates the league file
    pub fn load_leagues(&self) -> Result<LeagueTable, ConfigError> {
        let raw = std::fs::read_to_string(&self.leagues_path).map_err(|source| ConfigError::Read {
            path: self.leagues_path.display().to_string(),
            source,
        })?;
        let table = parse_leagues(&raw)?;

        info!(
            path = %self.leagues_path.display(),
            league_count = table.leagues().len(),
            "League table loaded"
        );
        Ok(table)
    }
}

/// Parses `[[leagues]]` entries in declaration order
pub fn parse_leagues(raw: &str) -> Result<LeagueTable, ConfigError> {
    let file: LeagueFile = toml::from_str(raw)?;
    let table = LeagueTable::new(file.leagues);
    table.validate()?;
    Ok(table)
}
