//! Ports - interfaces the domain needs from the outside world
//!
//! The domain defines what it needs; `portal-cache` and `portal-provider`
//! supply the implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{AccessToken, RawPresence};
use crate::error::{AuthError, DomainError, ProviderError};
use crate::value_objects::IdentityId;

/// Result type for token store operations
pub type StoreResult<T> = Result<T, DomainError>;

/// Result type for presence provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

// ============================================================================
// Token Store
// ============================================================================

/// Keyed storage holding at most one access token per identity
///
/// Operations on one key must be atomic with respect to each other; keys are
/// independent.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a token, replacing any previous one for the identity
    async fn put(&self, identity_id: &IdentityId, token: AccessToken) -> StoreResult<()>;

    /// Get the current token
    ///
    /// Fails with `DomainError::Unauthenticated` when none is on file.
    async fn get(&self, identity_id: &IdentityId) -> StoreResult<AccessToken>;

    /// Remove the token; removing an absent identity is a no-op
    async fn remove(&self, identity_id: &IdentityId) -> StoreResult<()>;

    /// Remove the token only if it is still `expected`
    ///
    /// Returns whether a token was removed. A token put after `expected` was
    /// read survives.
    async fn remove_if_current(
        &self,
        identity_id: &IdentityId,
        expected: &AccessToken,
    ) -> StoreResult<bool>;

    /// Check whether a token is on file
    async fn contains(&self, identity_id: &IdentityId) -> StoreResult<bool>;

    /// Number of identities with a token on file
    async fn len(&self) -> StoreResult<usize>;
}

// ============================================================================
// Presence Provider
// ============================================================================

/// Outcome of one identity inside a batch query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceLookup {
    Found(RawPresence),
    Failed(String),
}

/// Per-identity results of a batch presence query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPresence {
    results: HashMap<IdentityId, PresenceLookup>,
}

impl BatchPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful lookup, keyed by the presence's identity
    pub fn insert_found(&mut self, presence: RawPresence) {
        self.results
            .insert(presence.identity_id.clone(), PresenceLookup::Found(presence));
    }

    /// Record a failed lookup
    pub fn insert_failed(&mut self, identity_id: IdentityId, reason: impl Into<String>) {
        self.results
            .insert(identity_id, PresenceLookup::Failed(reason.into()));
    }

    pub fn get(&self, identity_id: &IdentityId) -> Option<&PresenceLookup> {
        self.results.get(identity_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Keep only successful lookups
    pub fn into_found(self) -> HashMap<IdentityId, RawPresence> {
        self.results
            .into_iter()
            .filter_map(|(id, lookup)| match lookup {
                PresenceLookup::Found(presence) => Some((id, presence)),
                PresenceLookup::Failed(_) => None,
            })
            .collect()
    }

    /// Number of failed lookups
    pub fn failed_count(&self) -> usize {
        self.results
            .values()
            .filter(|lookup| matches!(lookup, PresenceLookup::Failed(_)))
            .count()
    }
}

/// External source of raw presence
#[async_trait]
pub trait PresenceProvider: Send + Sync {
    /// Presence of the token owner
    async fn fetch_own(&self, token: &AccessToken) -> ProviderResult<RawPresence>;

    /// Presence of one identity
    async fn fetch_one(
        &self,
        token: &AccessToken,
        identity_id: &IdentityId,
    ) -> ProviderResult<RawPresence>;

    /// Presence of many identities in one call
    ///
    /// Individual identities may fail inside an `Ok` result; an `Err` means
    /// the whole batch failed.
    async fn fetch_batch(
        &self,
        token: &AccessToken,
        identity_ids: &[IdentityId],
    ) -> ProviderResult<BatchPresence>;
}

// ============================================================================
// Identity Provider
// ============================================================================

/// External issuer of access tokens (OAuth2 authorization-code flow)
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether client credentials are configured
    fn is_configured(&self) -> bool;

    /// URL the user agent is sent to in order to sign in
    fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchange an authorization code for a token owned by `identity_id`
    async fn exchange_code(
        &self,
        identity_id: &IdentityId,
        code: &str,
    ) -> Result<AccessToken, AuthError>;

    /// Obtain a fresh token from a refresh token
    async fn refresh(
        &self,
        identity_id: &IdentityId,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, Availability};

    fn id(raw: &str) -> IdentityId {
        IdentityId::parse(raw).unwrap()
    }

    #[test]
    fn test_batch_presence_found_and_failed() {
        let mut batch = BatchPresence::new();
        batch.insert_found(RawPresence::new(id("a"), Availability::Available, Activity::Available));
        batch.insert_failed(id("b"), "not found");

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.failed_count(), 1);
        assert!(matches!(batch.get(&id("a")), Some(PresenceLookup::Found(_))));
        assert!(batch.get(&id("c")).is_none());

        let found = batch.into_found();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&id("a")));
    }
}
