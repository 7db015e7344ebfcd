//! # portal-provider
//!
//! Outbound adapters implementing the presence and identity ports defined in
//! `portal-core`.
//!
//! ## Overview
//!
//! - `graph`: Microsoft Graph presence over HTTPS
//! - `oauth`: OAuth2 authorization-code flow against the Microsoft identity platform
//! - `mock`: scripted in-process providers for local runs and tests
//! - `models`: wire formats and their mapping onto domain types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portal_provider::{GraphPresenceProvider, OAuthIdentityProvider};
//!
//! let presence = GraphPresenceProvider::from_config(&config.provider)?;
//! let identity = OAuthIdentityProvider::from_config(config.oauth.clone(), &config.provider)?;
//! ```

pub mod error;
pub mod graph;
pub mod mock;
pub mod models;
pub mod oauth;

// Re-export commonly used types
pub use error::SetupError;
pub use graph::GraphPresenceProvider;
pub use mock::{MockIdentityProvider, ScriptedPresenceProvider};
pub use oauth::OAuthIdentityProvider;
