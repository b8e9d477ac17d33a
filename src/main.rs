use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leaderboard::{build_router, AppConfig, AppState, LeaderboardService, RedisScoreStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaderboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting leaderboard server");

    let config = AppConfig::from_env()?;
    let leagues = config.load_leagues()?;
    if leagues.is_empty() {
        error!("No leagues configured, every user will resolve to league 0");
    }

    let store = match RedisScoreStore::connect(&config.redis_url).await {
        Ok(store) => store,
        Err(e) => {
            error!(redis_url = %config.redis_url, error = %e, "Failed to connect to redis");
            return Err(e.into());
        }
    };

    let service = LeaderboardService::new(Arc::new(store), Arc::new(leagues))
        .with_store_timeout(config.store_timeout);
    let app = build_router(AppState::new(Arc::new(service))).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
