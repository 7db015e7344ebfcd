//! OAuth2 identity provider adapter

mod identity_client;

pub use identity_client::OAuthIdentityProvider;
