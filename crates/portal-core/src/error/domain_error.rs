//! Domain errors - error types for the domain layer

use thiserror::Error;

use super::provider_error::{AuthError, ProviderError};
use crate::value_objects::{IdentityId, IdentityIdError};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("No access token on file for identity {0}")]
    Unauthenticated(IdentityId),

    #[error("Authentication failed: {0}")]
    AuthFailed(#[from] AuthError),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid identity id: {0}")]
    InvalidIdentityId(#[from] IdentityIdError),

    // =========================================================================
    // External Collaborator Errors
    // =========================================================================
    #[error(transparent)]
    Provider(#[from] ProviderError),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Token store error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::AuthFailed(_) => "AUTH_FAILED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidIdentityId(_) => "INVALID_IDENTITY_ID",
            Self::Provider(_) => "PROVIDER_FAILURE",
            Self::StoreError(_) => "STORE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::AuthFailed(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidIdentityId(_))
    }

    /// Check if this came from the presence provider
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}
