//! Router configuration for the HTTP surface.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_feed, delete_feed, health_check, manage, register, root, stats, toggle_feed, trigger_all,
    trigger_user, unsubscribe, AppState,
};

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let manage_routes = Router::new()
        .route("/:user_id", get(manage))
        .route("/:user_id/feeds", post(add_feed))
        .route("/:user_id/feeds/:feed_id/delete", post(delete_feed))
        .route("/:user_id/feeds/:feed_id/toggle", post(toggle_feed))
        .route("/:user_id/unsubscribe", post(unsubscribe));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/trigger", get(trigger_all))
        .route("/trigger/:user_id", get(trigger_user))
        .route("/stats", get(stats))
        .nest("/manage", manage_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
