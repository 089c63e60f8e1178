//! Leaderboard and share-card HTTP service
//!
//! Routes:
//! - `GET  /api/leaderboard`: top 50 personal bests
//! - `POST /api/leaderboard`: submit a score (stored only if higher)
//! - `GET  /api/og?score=N`: share card image

mod routes;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::config::ServerConfig;
use crate::leaderboard::{FileStore, LeaderboardStore, MemoryStore};
use crate::{Error, Result};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeaderboardStore>,
    /// Cache lifetime for numeric share cards
    pub share_card_max_age: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn LeaderboardStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            share_card_max_age: config.share_card_max_age,
        }
    }

    /// Open the store the config asks for
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let store: Arc<dyn LeaderboardStore> = match &config.data_file {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => {
                log::warn!("No data file configured, scores are kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, config))
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/leaderboard",
            get(routes::get_leaderboard).post(routes::post_leaderboard),
        )
        .route("/api/og", get(routes::share_card))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            log::warn!("Rejected request: {self}");
            StatusCode::BAD_REQUEST
        } else {
            log::error!("Request failed: {self}");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
