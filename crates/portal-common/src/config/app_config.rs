//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub provider: ProviderConfig,
    pub oauth: OAuthConfig,
    pub roster: RosterConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which presence provider adapter to wire in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Microsoft Graph over HTTPS
    #[default]
    Graph,
    /// Deterministic in-process provider for local runs
    Mock,
}

impl FromStr for ProviderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "graph" => Ok(Self::Graph),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::InvalidValue(
                "PORTAL_PROVIDER_MODE",
                other.to_string(),
            )),
        }
    }
}

/// Presence provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub mode: ProviderMode,
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,
    /// Upper bound for a single provider attempt
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries after the first attempt for transient batch failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Largest caller-supplied bulk roster accepted
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl ProviderConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            base_url: default_graph_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

/// OAuth2 client configuration for the identity provider
#[derive(Clone, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Where the browser lands after the callback
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl OAuthConfig {
    /// Both client id and secret are present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.client_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    #[must_use]
    pub fn authorize_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/authorize",
            self.authority_url.trim_end_matches('/'),
            self.tenant_id
        )
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authority_url: default_authority_url(),
            tenant_id: default_tenant_id(),
            client_id: None,
            client_secret: None,
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            frontend_url: default_frontend_url(),
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("authority_url", &self.authority_url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}

/// Server-owned team roster
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RosterConfig {
    /// JSON file with `[{"id", "email", "display_name"}]`
    pub path: Option<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "team-portal".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    200
}

fn default_max_batch_size() -> usize {
    650 // getPresencesByUserId limit
}

fn default_authority_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_tenant_id() -> String {
    "common".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3001/api/v1/auth/callback".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "offline_access".to_string(),
        "User.Read".to_string(),
        "Presence.Read.All".to_string(),
    ]
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mode = match env::var("PORTAL_PROVIDER_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => ProviderMode::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT").ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            provider: ProviderConfig {
                mode,
                base_url: env::var("GRAPH_BASE_URL").unwrap_or_else(|_| default_graph_base_url()),
                request_timeout_ms: parse_var("PROVIDER_REQUEST_TIMEOUT_MS")
                    .unwrap_or_else(default_request_timeout_ms),
                max_retries: parse_var("PROVIDER_MAX_RETRIES").unwrap_or_else(default_max_retries),
                retry_base_delay_ms: parse_var("PROVIDER_RETRY_BASE_DELAY_MS")
                    .unwrap_or_else(default_retry_base_delay_ms),
                max_batch_size: parse_var("PROVIDER_MAX_BATCH_SIZE")
                    .unwrap_or_else(default_max_batch_size),
            },
            oauth: OAuthConfig {
                authority_url: env::var("OAUTH_AUTHORITY_URL")
                    .unwrap_or_else(|_| default_authority_url()),
                tenant_id: env::var("OAUTH_TENANT_ID").unwrap_or_else(|_| default_tenant_id()),
                client_id: non_empty_var("OAUTH_CLIENT_ID"),
                client_secret: non_empty_var("OAUTH_CLIENT_SECRET"),
                redirect_uri: env::var("OAUTH_REDIRECT_URI")
                    .unwrap_or_else(|_| default_redirect_uri()),
                scopes: list_var("OAUTH_SCOPES").unwrap_or_else(default_scopes),
                frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| default_frontend_url()),
            },
            roster: RosterConfig {
                path: non_empty_var("TEAM_ROSTER_PATH"),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST").unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: list_var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            },
        })
    }

    /// Configuration with defaults everywhere, bound to `port`
    ///
    /// Used by tests and local tooling that do not read the environment.
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            api: ServerConfig {
                host: default_host(),
                port,
            },
            provider: ProviderConfig::default(),
            oauth: OAuthConfig::default(),
            roster: RosterConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
