//! Service and digest trigger handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::digest::TickReport;
use crate::web::dto::{ApiResponse, StatsResponse, StatusResponse, TriggerUserResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

const SERVICE_LABEL: &str = "AI Daily Digest - Multi-User Platform";

/// GET / - Service banner.
pub async fn root() -> Json<ApiResponse<StatusResponse>> {
    Json(ApiResponse::new(StatusResponse::new("ok", SERVICE_LABEL)))
}

/// GET /health - Liveness probe.
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /stats - Platform statistics.
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let total_active_users = state.ctx.store.count_active_users().await?;

    Ok(Json(ApiResponse::new(StatsResponse {
        total_active_users,
        message: SERVICE_LABEL.to_string(),
    })))
}

/// GET /trigger - Run one scheduling pass now.
///
/// Only users due at the current hour receive a digest.
pub async fn trigger_all(State(state): State<Arc<AppState>>) -> Json<ApiResponse<TickReport>> {
    tracing::info!("Manual scheduling pass triggered");
    let report = state.scheduler.tick(Utc::now()).await;
    Json(ApiResponse::new(report))
}

/// GET /trigger/:user_id - Deliver a digest to one user immediately.
pub async fn trigger_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<TriggerUserResponse>>, ApiError> {
    let outcome = state.scheduler.trigger_user(&user_id).await?;

    Ok(Json(ApiResponse::new(TriggerUserResponse { user_id, outcome })))
}
