//! JSON review API over the finding store and whitelist.
//!
//! The HTML dashboard lives elsewhere; this server only exposes the
//! store's operations for review tooling.

use aegis_db::{findings, scans, DatabaseError, ScanStore};
use aegis_scanner::Whitelist;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    store: ScanStore,
    whitelist: Arc<Whitelist>,
}

/// Serve the review API until the process is stopped.
pub async fn run(addr: &str, store: ScanStore, whitelist: Arc<Whitelist>) -> anyhow::Result<()> {
    let state = AppState { store, whitelist };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/scans", get(list_scans))
        .route("/api/scans/:id", get(get_scan))
        .route("/api/feedback", post(post_feedback))
        .route("/api/whitelist", post(post_whitelist))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_scans(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match scans::get_all_scans(state.store.pool()).await {
        Ok(scans) => Ok(Json(serde_json::json!(scans))),
        Err(e) => {
            tracing::error!("failed to list scans: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let scan = scans::get_scan_by_id(state.store.pool(), &id)
        .await
        .map_err(|e| {
            tracing::error!("failed to load scan {id}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let scan_findings = findings::get_by_scan(state.store.pool(), &id)
        .await
        .map_err(|e| {
            tracing::error!("failed to load findings for scan {id}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(serde_json::json!({
        "scan": scan,
        "findings": scan_findings,
    })))
}

#[derive(Deserialize)]
struct FeedbackRequest {
    finding_id: String,
    feedback: String,
}

async fn post_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> StatusCode {
    match findings::update_feedback(state.store.pool(), &request.finding_id, &request.feedback)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(DatabaseError::InvalidFeedback(_)) => StatusCode::BAD_REQUEST,
        Err(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
        Err(e) => {
            tracing::error!("failed to update feedback: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Deserialize)]
struct WhitelistRequest {
    value: String,
}

async fn post_whitelist(
    State(state): State<AppState>,
    Json(request): Json<WhitelistRequest>,
) -> StatusCode {
    match state.whitelist.add(&request.value) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("failed to persist whitelist entry: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
