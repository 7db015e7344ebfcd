//! Access token entity - a credential for the presence provider

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::IdentityId;

/// Longest lifetime recorded for a token, in seconds (one year)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Provider access token held on behalf of one identity
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub owning_identity_id: IdentityId,
    pub value: String,
    pub issued_at: DateTime<Utc>,
    /// `None` means the issuer gave no lifetime; the token never expires locally
    pub expires_at: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
}

impl AccessToken {
    /// Create a token without expiry metadata
    pub fn new(owning_identity_id: IdentityId, value: impl Into<String>) -> Self {
        Self {
            owning_identity_id,
            value: value.into(),
            issued_at: Utc::now(),
            expires_at: None,
            refresh_token: None,
        }
    }

    /// Set the lifetime relative to `issued_at`
    ///
    /// Lifetimes are clamped to `MAX_TOKEN_LIFETIME_SECS` in either direction.
    #[must_use]
    pub fn with_expires_in(mut self, seconds: i64) -> Self {
        let seconds = seconds.clamp(-MAX_TOKEN_LIFETIME_SECS, MAX_TOKEN_LIFETIME_SECS);
        self.expires_at = Duration::try_seconds(seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime));
        self
    }

    /// Attach a refresh token
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Re-own a token issued by the identity provider
    #[must_use]
    pub fn owned_by(mut self, identity_id: IdentityId) -> Self {
        self.owning_identity_id = identity_id;
        self
    }

    /// Check whether the token is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Check whether the token is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// Token values never reach logs
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("owning_identity_id", &self.owning_identity_id)
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}
