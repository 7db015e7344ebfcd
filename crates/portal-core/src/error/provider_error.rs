//! Errors raised by external collaborators (presence and identity providers)

use thiserror::Error;

/// Failure talking to the presence provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Provider rate limited the request: {0}")]
    RateLimited(String),

    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Provider transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Provider response could not be decoded: {0}")]
    Decode(String),

    #[error("Identity not found at provider: {0}")]
    NotFound(String),
}

impl ProviderError {
    /// Whether retrying the same request might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Timeout(_) | Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::Decode(_) | Self::NotFound(_) => false,
        }
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::RateLimited(_) => "rate_limited",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Http { .. } => "http",
            Self::Decode(_) => "decode",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// Failure exchanging or refreshing credentials with the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Identity provider is not configured")]
    NotConfigured,

    #[error("Authorization code rejected: {0}")]
    Rejected(String),

    #[error("Identity provider unreachable: {0}")]
    Transport(String),

    #[error("Identity provider response invalid: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Whether the same request may succeed later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Timeout("t".into()).is_transient());
        assert!(ProviderError::Transport("t".into()).is_transient());
        assert!(ProviderError::RateLimited("t".into()).is_transient());
        assert!(ProviderError::Http { status: 503, message: String::new() }.is_transient());
        assert!(!ProviderError::Http { status: 400, message: String::new() }.is_transient());
        assert!(!ProviderError::Unauthorized("t".into()).is_transient());
        assert!(!ProviderError::Decode("t".into()).is_transient());
    }

    #[test]
    fn test_auth_transient_classification() {
        assert!(AuthError::Transport("reset".into()).is_transient());
        assert!(!AuthError::Rejected("invalid_grant".into()).is_transient());
        assert!(!AuthError::NotConfigured.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Http { status: 502, message: "bad gateway".into() };
        assert_eq!(err.to_string(), "Provider returned HTTP 502: bad gateway");
        assert_eq!(err.kind(), "http");
    }
}
