//! HTTP surface for Daily Digest.
//!
//! Registration, subscription management, manual triggers and service
//! statistics, served as JSON over axum.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
