// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for SeriesHub.
//!
//! Every endpoint maps 1:1 to a [`ProviderRegistry`] operation. Errors are
//! rendered as `{"error": {"code", "message"}}` with a status derived from
//! the [`ScrapeError`] kind.

use crate::error::ScrapeError;
use crate::providers::registry::ProviderRegistry;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

/// Build the axum Router with all REST endpoints.
pub fn router(registry: Arc<ProviderRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/series/:source_type/search/:query", get(handle_search))
        .route("/api/series/:source_type/:name_id", get(handle_details))
        .route(
            "/api/series/:source_type/:name_id/:episode_id",
            get(handle_video_servers),
        )
        .layer(cors)
        .with_state(registry)
}

/// Start the REST API server on the given port.
pub async fn start(port: u16, registry: Arc<ProviderRegistry>) -> anyhow::Result<()> {
    let app = router(registry);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

impl ScrapeError {
    fn status(&self) -> StatusCode {
        match self {
            ScrapeError::UnsupportedProviderType(_) => StatusCode::BAD_REQUEST,
            ScrapeError::NotFound(_) => StatusCode::NOT_FOUND,
            ScrapeError::ProviderUnavailable(_) | ScrapeError::ParseFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": { "code": self.code(), "message": self.to_string() }
        });
        (self.status(), Json(body)).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_search(
    State(registry): State<Arc<ProviderRegistry>>,
    Path((source_type, query)): Path<(String, String)>,
) -> Result<Json<Value>, ScrapeError> {
    debug!(%source_type, %query, "REST search");
    let series = registry.search_series(&source_type, &query).await?;
    Ok(Json(serde_json::to_value(series)?))
}

async fn handle_details(
    State(registry): State<Arc<ProviderRegistry>>,
    Path((source_type, name_id)): Path<(String, String)>,
) -> Result<Json<Value>, ScrapeError> {
    debug!(%source_type, %name_id, "REST details");
    let details = registry.get_series_details(&source_type, &name_id).await?;
    Ok(Json(serde_json::to_value(details)?))
}

async fn handle_video_servers(
    State(registry): State<Arc<ProviderRegistry>>,
    Path((source_type, name_id, episode_id)): Path<(String, String, String)>,
) -> Result<Json<Value>, ScrapeError> {
    debug!(%source_type, %name_id, %episode_id, "REST video servers");
    // An unknown source type takes precedence over a malformed episode id.
    registry.get(&source_type)?;
    let episode_id: u32 = episode_id
        .parse()
        .map_err(|_| ScrapeError::NotFound(format!("episode `{episode_id}`")))?;
    let videos = registry
        .get_video_servers(&source_type, &name_id, episode_id)
        .await?;
    Ok(Json(serde_json::to_value(videos)?))
}
