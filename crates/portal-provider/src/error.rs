//! Adapter construction errors

/// Failure building an outbound adapter from configuration
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Provider URL cannot be used as a base: {0}")]
    NotABase(String),

    #[error("HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}
