//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; bodies also implement `Validate`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Token handed over by a client that ran the login itself
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreTokenRequest {
    #[validate(length(min = 1, message = "access_token must not be empty"))]
    pub access_token: String,

    /// Lifetime in seconds from now
    #[validate(range(
        min = 1,
        max = 31_536_000,
        message = "expires_in must be between 1 second and one year"
    ))]
    pub expires_in: Option<i64>,

    pub refresh_token: Option<String>,
}

/// Query of the OAuth redirect back to the portal
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the identity provider when the user declined or sign-in failed
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Caller identity given as a query parameter
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IdentityQuery {
    pub identity_id: Option<String>,
}

// ============================================================================
// Presence Requests
// ============================================================================

/// Caller-supplied roster
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkPresenceRequest {
    #[validate(length(min = 1, message = "identity_ids must not be empty"))]
    pub identity_ids: Vec<String>,
}
