use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{
    LeaderboardQuery, LeaderboardResponse, LeaguesQuery, LeaguesResponse, PointsRequest,
    RankResponse, UserPointsResponse, DEFAULT_PAGE_LIMIT,
};
use crate::league::{models::DEFAULT_LOCALE, LeagueId};
use crate::shared::{AppError, AppState};

/// HTTP handler for one page of a league
///
/// GET /league/:league_id/leaderboard?cursor=&limit=
/// Returns the page items and the cursor for the next page ("" at the end)
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(league_id): Path<LeagueId>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let page = state
        .leaderboard
        .get_page(league_id, &query.cursor, limit)
        .await?;

    info!(
        league_id,
        item_count = page.items.len(),
        "League page served"
    );

    Ok(Json(LeaderboardResponse {
        items: page.items,
        next_cursor: page.next_cursor,
        limit,
    }))
}

/// HTTP handler for a user's rank inside a league
///
/// GET /league/:league_id/user/:user_id/rank
#[instrument(name = "get_user_rank", skip(state))]
pub async fn get_user_rank(
    State(state): State<AppState>,
    Path((league_id, user_id)): Path<(LeagueId, String)>,
) -> Result<Json<RankResponse>, AppError> {
    let rank = state.leaderboard.get_rank(league_id, &user_id).await?;

    Ok(Json(RankResponse {
        user_id,
        league: league_id,
        rank,
    }))
}

/// POST /user/:user_id/points/add
#[instrument(name = "add_points", skip(state))]
pub async fn add_points(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<PointsRequest>,
) -> Result<Json<UserPointsResponse>, AppError> {
    let update = state
        .leaderboard
        .add_points(&user_id, request.delta)
        .await?;

    Ok(Json(UserPointsResponse {
        user_id,
        points: update.points,
        league: update.league_id,
    }))
}

/// POST /user/:user_id/points/remove
#[instrument(name = "remove_points", skip(state))]
pub async fn remove_points(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<PointsRequest>,
) -> Result<Json<UserPointsResponse>, AppError> {
    let update = state
        .leaderboard
        .remove_points(&user_id, request.delta)
        .await?;

    Ok(Json(UserPointsResponse {
        user_id,
        points: update.points,
        league: update.league_id,
    }))
}

/// GET /user/:user_id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPointsResponse>, AppError> {
    let user = state.leaderboard.user_state(&user_id).await?;

    Ok(Json(UserPointsResponse {
        user_id: user.user_id,
        points: user.points,
        league: user.league_id,
    }))
}

/// GET /leagues?lang=
#[instrument(name = "list_leagues", skip(state))]
pub async fn list_leagues(
    State(state): State<AppState>,
    Query(query): Query<LeaguesQuery>,
) -> Json<LeaguesResponse> {
    let locale = query.lang.as_deref().unwrap_or(DEFAULT_LOCALE);
    Json(LeaguesResponse {
        leagues: state.leaderboard.league_summaries(locale),
    })
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::leaderboard::types::{
        LeaderboardResponse, LeaguesResponse, RankResponse, UserPointsResponse,
    };
    use crate::shared::test_utils::AppStateBuilder;
    use crate::store::InMemoryScoreStore;
    use std::sync::Arc;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use tower::ServiceExt; // for `oneshot`

    fn post_points(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_add_points_handler() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(post_points("/user/alice/points/add", r#"{"delta": 120}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: UserPointsResponse = read_json(response).await;
        assert_eq!(body.user_id, "alice");
        assert_eq!(body.points, 120);
        assert_eq!(body.league, 2);
    }

    #[tokio::test]
    async fn test_negative_delta_is_bad_request() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(post_points("/user/alice/points/remove", r#"{"delta": -1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("delta"));
    }

    #[tokio::test]
    async fn test_rank_handler_not_found() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app.oneshot(get("/league/1/user/ghost/rank")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_leaderboard_and_rank_handlers() {
        let app = build_router(AppStateBuilder::new().build());

        for (user, delta) in [("alice", 30), ("bob", 70), ("carol", 50)] {
            let response = app
                .clone()
                .oneshot(post_points(
                    &format!("/user/{user}/points/add"),
                    &format!(r#"{{"delta": {delta}}}"#),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(get("/league/1/leaderboard?limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page: LeaderboardResponse = read_json(response).await;
        let ids: Vec<&str> = page.items.iter().map(|i| i.user_id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "carol"]);
        assert_eq!(page.next_cursor, "50:carol");
        assert_eq!(page.limit, 2);

        let response = app
            .clone()
            .oneshot(get("/league/1/leaderboard?cursor=50:carol&limit=2"))
            .await
            .unwrap();
        let page: LeaderboardResponse = read_json(response).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].user_id, "alice");
        assert_eq!(page.items[0].rank, 3);

        let response = app.oneshot(get("/league/1/user/carol/rank")).await.unwrap();
        let rank: RankResponse = read_json(response).await;
        assert_eq!(rank.rank, 2);
        assert_eq!(rank.league, 1);
    }

    #[tokio::test]
    async fn test_leaderboard_default_limit_and_bad_cursor() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app
            .clone()
            .oneshot(get("/league/1/leaderboard"))
            .await
            .unwrap();
        let page: LeaderboardResponse = read_json(response).await;
        assert_eq!(page.limit, 20);
        assert!(page.items.is_empty());

        let response = app
            .oneshot(get("/league/1/leaderboard?cursor=oops"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_outage_is_service_unavailable() {
        let store = Arc::new(InMemoryScoreStore::new());
        let app = build_router(AppStateBuilder::new().with_store(store.clone()).build());
        store.set_unavailable(true);

        let response = app.oneshot(get("/user/alice")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_leagues_localized() {
        let app = build_router(AppStateBuilder::new().build());

        let response = app.oneshot(get("/leagues?lang=ru")).await.unwrap();

        let body: LeaguesResponse = read_json(response).await;
        assert_eq!(body.leagues.len(), 2);
        assert_eq!(body.leagues[0].name, "Бронза");
        assert_eq!(body.leagues[1].name, "Silver");
    }
}
