//! Registration and subscription management handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::account::{AddFeedRequest, RegisterRequest};
use crate::web::dto::{
    AddFeedForm, ApiResponse, FeedResponse, ManageResponse, RegisterForm, RegisterResponse,
    StatusResponse, ToggleFeedForm, ValidatedForm,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /register - Register a new subscriber.
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedForm(form): ValidatedForm<RegisterForm>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let request = RegisterRequest::new(form.email, form.slack_webhook_url)
        .with_timezone(form.timezone)
        .with_schedule_hour(form.schedule_hour);

    let user_id = state.accounts().register(&request).await?;

    let base = state.base_url(&headers);
    let response = RegisterResponse {
        trigger_url: format!("{}trigger/{}", base, user_id),
        manage_url: format!("{}manage/{}", base, user_id),
        user_id,
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// GET /manage/:user_id - User details and all feeds.
pub async fn manage(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<ManageResponse>>, ApiError> {
    let overview = state.accounts().overview(&user_id).await?;

    Ok(Json(ApiResponse::new(ManageResponse {
        user: overview.user.into(),
        feeds: overview.feeds.into_iter().map(FeedResponse::from).collect(),
    })))
}

/// POST /manage/:user_id/feeds - Subscribe to a feed.
pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ValidatedForm(form): ValidatedForm<AddFeedForm>,
) -> Result<(StatusCode, Json<ApiResponse<FeedResponse>>), ApiError> {
    let mut request = AddFeedRequest::new(user_id, form.url);
    if let Some(name) = form.name {
        request = request.with_name(name);
    }

    let feed = state.accounts().add_feed(&request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(feed.into()))))
}

/// POST /manage/:user_id/feeds/:feed_id/delete - Remove a feed.
pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    Path((user_id, feed_id)): Path<(String, i64)>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    state.accounts().remove_feed(&user_id, feed_id).await?;

    Ok(Json(ApiResponse::new(StatusResponse::new(
        "deleted",
        format!("Feed {} removed", feed_id),
    ))))
}

/// POST /manage/:user_id/feeds/:feed_id/toggle - Enable or disable a feed.
pub async fn toggle_feed(
    State(state): State<Arc<AppState>>,
    Path((user_id, feed_id)): Path<(String, i64)>,
    ValidatedForm(form): ValidatedForm<ToggleFeedForm>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    state
        .accounts()
        .set_feed_active(&user_id, feed_id, form.active)
        .await?;

    let status = if form.active { "enabled" } else { "disabled" };
    Ok(Json(ApiResponse::new(StatusResponse::new(
        status,
        format!("Feed {} {}", feed_id, status),
    ))))
}

/// POST /manage/:user_id/unsubscribe - Stop all digests for a user.
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    state.accounts().deactivate(&user_id).await?;

    Ok(Json(ApiResponse::new(StatusResponse::new(
        "unsubscribed",
        "You will no longer receive digests",
    ))))
}
