//! Test setup infrastructure - builds a service over the in-memory store
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;

use leaderboard::{InMemoryScoreStore, League, LeaderboardService, LeagueTable};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: Arc<InMemoryScoreStore>,
    pub service: Arc<LeaderboardService>,
    pub leagues: Arc<LeagueTable>,
}

pub struct TestSetupBuilder {
    leagues: Vec<League>,
    seeded: Vec<(String, i64)>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            leagues: vec![],
            seeded: vec![],
        }
    }

    pub fn with_leagues(mut self, leagues: Vec<League>) -> Self {
        self.leagues = leagues;
        self
    }

    /// League 1 for 0..=99, league 2 from 100 up
    pub fn with_two_leagues(self) -> Self {
        self.with_leagues(vec![
            League::new(1, 0, 99).with_name("en", "Bronze"),
            League::new(2, 100, -1).with_name("en", "Silver"),
        ])
    }

    pub fn with_tiered_leagues(self) -> Self {
        self.with_leagues(vec![
            League::new(1, 0, 99),
            League::new(2, 100, 499),
            League::new(3, 500, 1499),
            League::new(4, 1500, -1),
        ])
    }

    /// Users to give points before the test starts
    pub fn with_users(mut self, users: Vec<(&str, i64)>) -> Self {
        self.seeded = users
            .into_iter()
            .map(|(user, points)| (user.to_string(), points))
            .collect();
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryScoreStore::new());
        let leagues = Arc::new(LeagueTable::new(self.leagues));
        let service = Arc::new(LeaderboardService::new(store.clone(), leagues.clone()));

        for (user, points) in &self.seeded {
            service.add_points(user, *points).await.unwrap();
        }

        TestSetup {
            store,
            service,
            leagues,
        }
    }
}

impl TestSetup {
    /// Walks a league page by page until the cursor runs out
    pub async fn collect_league(&self, league_id: i32, page_size: i64) -> Vec<(String, f64, u64)> {
        let mut collected = vec![];
        let mut cursor = String::new();
        loop {
            let page = self
                .service
                .get_page(league_id, &cursor, page_size)
                .await
                .unwrap();
            collected.extend(
                page.items
                    .into_iter()
                    .map(|item| (item.user_id, item.points, item.rank)),
            );
            if page.next_cursor.is_empty() {
                return collected;
            }
            cursor = page.next_cursor;
        }
    }
}
