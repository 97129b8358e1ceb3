use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use classplanner::config::AppConfig;
use classplanner::db::ScheduleDbManager;
use classplanner::provider::HttpCourseProvider;
use classplanner::server::create_router;
use classplanner::suggest::SuggestionClient;
use classplanner::types::PlannerState;

/// How often expired search results are swept from the cache
const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(term = %config.term, db = %config.db_path, "Starting class planner");

    let schedule_db = ScheduleDbManager::new(&config.db_path)
        .context("Failed to open offerings database")?;
    let provider = HttpCourseProvider::new(&config.provider)
        .context("Failed to set up course provider")?;
    let suggestion_client = SuggestionClient::from_config(config.suggestion.clone())
        .context("Failed to set up suggestion client")?;

    let address = config.bind_address();
    let state = Arc::new(PlannerState::new(
        config,
        schedule_db,
        Arc::new(provider),
        suggestion_client,
    ));
    state.spawn_cache_sweeper(CACHE_SWEEP_INTERVAL);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
