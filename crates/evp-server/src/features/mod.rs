//! Feature modules implementing the EVP API
//!
//! Each feature is organized as a vertical slice with its own commands
//! (write operations), queries (read operations), and routes:
//!
//! - **uploads**: CSV upload ingestion and per-session progress queries

pub mod uploads;

use axum::Router;
use std::sync::Arc;

use evp_pipeline::SessionManager;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Session manager driving the validation pipeline
    pub manager: Arc<SessionManager>,
}

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/uploads` - CSV upload and progress queries
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/uploads", uploads::uploads_routes().with_state(state))
}
