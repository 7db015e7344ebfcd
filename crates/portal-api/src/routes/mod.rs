//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, integration, presence};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(presence_routes())
        .merge(integration_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(auth::store_token))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
}

/// Presence routes
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/me", get(presence::get_own_presence))
        .route("/presence/users/:target_id", get(presence::get_user_presence))
        .route("/presence/team", get(presence::get_team_presence))
        .route("/presence/bulk", post(presence::get_bulk_presence))
}

fn integration_routes() -> Router<AppState> {
    Router::new().route("/integration/status", get(integration::get_status))
}
