//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use portal_api::{create_app, AppState};
use portal_cache::InMemoryTokenStore;
use portal_common::{AppConfig, RateLimitConfig};
use portal_core::Identity;
use portal_provider::{MockIdentityProvider, ScriptedPresenceProvider};
use portal_service::{FetchPolicy, ServiceContextBuilder, TeamRoster};
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Header carrying the caller identity
pub const IDENTITY_HEADER: &str = "x-identity-id";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Scripted provider behind the server, for arranging presence and failures
    pub provider: Arc<ScriptedPresenceProvider>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with an empty roster
    pub async fn start() -> Result<Self> {
        Self::start_with_roster(Vec::new()).await
    }

    /// Start a test server whose team roster is `members`
    pub async fn start_with_roster(members: Vec<Identity>) -> Result<Self> {
        Self::start_with(members, MockIdentityProvider::new()).await
    }

    /// Start a test server with a specific identity provider
    pub async fn start_with(
        members: Vec<Identity>,
        identity_provider: MockIdentityProvider,
    ) -> Result<Self> {
        let provider = ScriptedPresenceProvider::new_shared();
        let service_context = ServiceContextBuilder::new()
            .token_store(InMemoryTokenStore::new_shared())
            .presence_provider(provider.clone())
            .identity_provider(Arc::new(identity_provider))
            .roster(TeamRoster::new(members))
            .fetch_policy(test_fetch_policy())
            .build()?;
        let state = AppState::new(service_context, test_config());

        // Build application
        let app = create_app(state);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are asserted on, not followed
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            provider,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn as_identity(&self, builder: RequestBuilder, identity_id: &str) -> RequestBuilder {
        builder.header(IDENTITY_HEADER, identity_id)
    }

    /// Make a GET request without a caller identity
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request on behalf of `identity_id`
    pub async fn get_as(&self, path: &str, identity_id: &str) -> Result<Response> {
        let builder = self.as_identity(self.client.get(self.url(path)), identity_id);
        Ok(builder.send().await?)
    }

    /// Make a POST request with JSON body without a caller identity
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with JSON body on behalf of `identity_id`
    pub async fn post_as<T: Serialize>(
        &self,
        path: &str,
        identity_id: &str,
        body: &T,
    ) -> Result<Response> {
        let builder = self.as_identity(self.client.post(self.url(path)), identity_id);
        Ok(builder.json(body).send().await?)
    }

    /// Make a bodyless POST request on behalf of `identity_id`
    pub async fn post_empty_as(&self, path: &str, identity_id: &str) -> Result<Response> {
        let builder = self.as_identity(self.client.post(self.url(path)), identity_id);
        Ok(builder.send().await?)
    }

    /// Hand the server a token for `identity_id`
    pub async fn login(&self, identity_id: &str) -> Result<()> {
        let body = serde_json::json!({ "access_token": format!("token-{identity_id}") });
        let response = self.post_as("/api/v1/auth/token", identity_id, &body).await?;
        assert_status(response, StatusCode::NO_CONTENT).await
    }
}

/// Configuration with defaults and a rate limit tests never hit
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::with_port(0);
    config.rate_limit = RateLimitConfig {
        requests_per_second: 1000,
        burst: 1000,
    };
    config
}

/// Fast timeouts and no backoff
pub fn test_fetch_policy() -> FetchPolicy {
    FetchPolicy {
        request_timeout: Duration::from_millis(500),
        max_retries: 1,
        retry_base_delay: Duration::ZERO,
        max_batch_size: 10,
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}
