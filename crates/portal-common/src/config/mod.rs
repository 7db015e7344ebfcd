//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, Environment, OAuthConfig, ProviderConfig,
    ProviderMode, RateLimitConfig, RosterConfig, ServerConfig,
};
