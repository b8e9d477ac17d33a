use super::LeaderboardError;
use crate::store::ScoredMember;

/// Separates the score from the user id. Scores never contain it, so
/// parsing splits at the first occurrence and user ids may contain it.
pub const CURSOR_DELIMITER: char = ':';

/// Position of the last item delivered on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub score: f64,
    pub user_id: String,
}

impl Cursor {
    pub fn new(score: f64, user_id: impl Into<String>) -> Self {
        Self {
            score,
            user_id: user_id.into(),
        }
    }

    /// Whole scores print without a fraction ("120"); others use the
    /// shortest representation that parses back to the same value.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.score, CURSOR_DELIMITER, self.user_id)
    }

    /// `Ok(None)` for the empty cursor, meaning "start of leaderboard"
    pub fn parse(raw: &str) -> Result<Option<Self>, LeaderboardError> {
        if raw.is_empty() {
            return Ok(None);
        }

        let malformed = || LeaderboardError::InvalidArgument(format!("invalid cursor: {raw}"));

        let (score, user_id) = raw.split_once(CURSOR_DELIMITER).ok_or_else(malformed)?;
        let score: f64 = score.parse().map_err(|_| malformed())?;
        if !score.is_finite() || user_id.is_empty() {
            return Err(malformed());
        }

        Ok(Some(Self::new(score, user_id)))
    }

    /// Exact match on both score and member
    pub fn matches(&self, scored: &ScoredMember) -> bool {
        scored.score == self.score && scored.member == self.user_id
    }
}

pub fn build_cursor(score: f64, user_id: &str) -> String {
    Cursor::new(score, user_id).encode()
}
