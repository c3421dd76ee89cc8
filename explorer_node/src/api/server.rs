//! Explorer API server setup

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{
    health_check, leaderboard_creators, leaderboard_subjects, search_attestations,
    submit_attestation, submit_batch,
};
use crate::config::ExplorerConfig;
use crate::indexer::IndexerClient;
use crate::station::StationClient;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub indexer: Arc<IndexerClient>,
    pub station: Arc<StationClient>,
}

// API Router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health_check))
        // Search and submission
        .route(
            "/attestations",
            get(search_attestations).post(submit_attestation),
        )
        .route("/attestations/batch", post(submit_batch))
        // Statistics
        .route("/leaderboard/creators", get(leaderboard_creators))
        .route("/leaderboard/subjects", get(leaderboard_subjects))
        // CORS for browser dashboards
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .with_state(state)
}

// Server startup
pub async fn start_api_server(config: ExplorerConfig) -> Result<()> {
    println!(
        "🚀 Starting AttestationStation Explorer API on port {}",
        config.listen_port
    );

    let indexer = IndexerClient::new(&config.indexer_url, config.indexer_api_key.clone())?;
    let station = StationClient::new(
        &config.rpc_url,
        &config.station_address,
        config.private_key.as_deref(),
        config.chain,
    )?;

    let state = AppState {
        indexer: Arc::new(indexer),
        station: Arc::new(station),
    };
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.listen_port)).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
