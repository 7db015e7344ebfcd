//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use portal_cache::InMemoryTokenStore;
use portal_common::{AppConfig, AppError, ProviderMode};
use portal_core::{IdentityProvider, PresenceProvider};
use portal_provider::{
    GraphPresenceProvider, MockIdentityProvider, OAuthIdentityProvider, ScriptedPresenceProvider,
};
use portal_service::{FetchPolicy, ServiceContextBuilder, TeamRoster};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes get the plain stack; the API additionally gets CORS and
/// rate limiting.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    Router::new().merge(health).merge(api).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let roster = match &config.roster.path {
        Some(path) => TeamRoster::load(path).await?,
        None => {
            warn!("TEAM_ROSTER_PATH not set; team presence will be empty");
            TeamRoster::empty()
        }
    };

    let presence_provider: Arc<dyn PresenceProvider>;
    let identity_provider: Arc<dyn IdentityProvider>;
    match config.provider.mode {
        ProviderMode::Graph => {
            let presence = GraphPresenceProvider::from_config(&config.provider)
                .map_err(|e| AppError::Config(e.to_string()))?
                .with_batch_limit(config.provider.max_batch_size);
            let identity =
                OAuthIdentityProvider::from_config(config.oauth.clone(), &config.provider)
                    .map_err(|e| AppError::Config(e.to_string()))?;
            if !config.oauth.is_configured() {
                warn!("OAuth client credentials not configured; login is unavailable");
            }
            info!(base_url = %config.provider.base_url, "Using Graph presence provider");
            presence_provider = Arc::new(presence);
            identity_provider = Arc::new(identity);
        }
        ProviderMode::Mock => {
            info!("Using scripted mock presence provider");
            presence_provider = Arc::new(ScriptedPresenceProvider::seeded(roster.members()));
            identity_provider = Arc::new(MockIdentityProvider::new());
        }
    }

    let service_context = ServiceContextBuilder::new()
        .token_store(InMemoryTokenStore::new_shared())
        .presence_provider(presence_provider)
        .identity_provider(identity_provider)
        .roster(roster)
        .fetch_policy(FetchPolicy::from_config(&config.provider))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until Ctrl+C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config.api.address().parse().map_err(|e| {
        AppError::Config(format!("Invalid listen address {}: {}", config.api.address(), e))
    })?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_common::RosterConfig;

    #[tokio::test]
    async fn test_create_app_state_mock_mode() {
        let mut config = AppConfig::with_port(0);
        config.provider.mode = ProviderMode::Mock;

        let state = create_app_state(config).await.unwrap();
        assert!(state.service_context().roster().is_empty());
        assert!(state.service_context().identity_provider().is_configured());
    }

    #[tokio::test]
    async fn test_create_app_state_graph_mode_without_credentials() {
        let config = AppConfig::with_port(0);

        let state = create_app_state(config).await.unwrap();
        assert!(!state.service_context().identity_provider().is_configured());
    }

    #[tokio::test]
    async fn test_missing_roster_file_fails_startup() {
        let mut config = AppConfig::with_port(0);
        config.roster = RosterConfig {
            path: Some("/nonexistent/roster.json".to_string()),
        };

        assert!(create_app_state(config).await.is_err());
    }
}
