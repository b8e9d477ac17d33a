//! Test assertion helpers - verifying league membership in the store
#![allow(dead_code)] // Test utilities may not all be used in every test

use leaderboard::leaderboard::keys::{league_key, user_league_key, user_points_key};
use leaderboard::ScoreStore;

use super::setup::TestSetup;

pub struct MembershipAssertion<'a> {
    setup: &'a TestSetup,
    user_id: &'a str,
}

impl<'a> MembershipAssertion<'a> {
    pub fn for_user(setup: &'a TestSetup, user_id: &'a str) -> Self {
        Self { setup, user_id }
    }

    /// Asserts the user sits in exactly `league_id` among all configured
    /// leagues, scored at `points`, with matching points counter and marker.
    pub async fn is_only_in(self, league_id: i32, points: i64) {
        for league in self.setup.leagues.leagues() {
            let members = self.setup.store.members(&league_key(league.id)).await;
            let entry = members.iter().find(|scored| scored.member == self.user_id);

            if league.id == league_id {
                let entry = entry.unwrap_or_else(|| {
                    panic!("{} should be in league {}", self.user_id, league_id)
                });
                assert_eq!(
                    entry.score, points as f64,
                    "{} has wrong score in league {}",
                    self.user_id, league_id
                );
            } else {
                assert!(
                    entry.is_none(),
                    "{} should not be in league {}",
                    self.user_id,
                    league.id
                );
            }
        }

        let store = &self.setup.store;
        assert_eq!(
            store.get_int(&user_points_key(self.user_id)).await.unwrap(),
            Some(points),
            "{} has wrong points counter",
            self.user_id
        );
        assert_eq!(
            store.get_int(&user_league_key(self.user_id)).await.unwrap(),
            Some(i64::from(league_id)),
            "{} has wrong recorded league",
            self.user_id
        );
    }
}
