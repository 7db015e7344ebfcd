//! Service context - dependency container for services
//!
//! Holds the token store, the outbound providers, the team roster and the
//! fetch policy.

use std::sync::Arc;

use portal_core::{IdentityProvider, PresenceProvider, TokenStore};

use super::batch_fetcher::FetchPolicy;
use super::error::{ServiceError, ServiceResult};
use crate::roster::TeamRoster;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    token_store: Arc<dyn TokenStore>,
    presence_provider: Arc<dyn PresenceProvider>,
    identity_provider: Arc<dyn IdentityProvider>,
    roster: Arc<TeamRoster>,
    fetch_policy: FetchPolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        token_store: Arc<dyn TokenStore>,
        presence_provider: Arc<dyn PresenceProvider>,
        identity_provider: Arc<dyn IdentityProvider>,
        roster: Arc<TeamRoster>,
        fetch_policy: FetchPolicy,
    ) -> Self {
        Self {
            token_store,
            presence_provider,
            identity_provider,
            roster,
            fetch_policy,
        }
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.token_store.as_ref()
    }

    pub fn presence_provider(&self) -> &dyn PresenceProvider {
        self.presence_provider.as_ref()
    }

    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity_provider.as_ref()
    }

    /// Server-owned team roster
    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    pub fn fetch_policy(&self) -> &FetchPolicy {
        &self.fetch_policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("token_store", &"dyn TokenStore")
            .field("presence_provider", &"dyn PresenceProvider")
            .field("identity_provider", &"dyn IdentityProvider")
            .field("roster_len", &self.roster.len())
            .field("fetch_policy", &self.fetch_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    token_store: Option<Arc<dyn TokenStore>>,
    presence_provider: Option<Arc<dyn PresenceProvider>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    roster: Option<TeamRoster>,
    fetch_policy: Option<FetchPolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn presence_provider(mut self, provider: Arc<dyn PresenceProvider>) -> Self {
        self.presence_provider = Some(provider);
        self
    }

    pub fn identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn roster(mut self, roster: TeamRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch_policy = Some(policy);
        self
    }

    /// Build the ServiceContext
    ///
    /// Roster defaults to empty and the fetch policy to the provider defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a store or provider is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.token_store
                .ok_or_else(|| ServiceError::validation("token_store is required"))?,
            self.presence_provider
                .ok_or_else(|| ServiceError::validation("presence_provider is required"))?,
            self.identity_provider
                .ok_or_else(|| ServiceError::validation("identity_provider is required"))?,
            Arc::new(self.roster.unwrap_or_default()),
            self.fetch_policy.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_cache::InMemoryTokenStore;
    use portal_provider::{MockIdentityProvider, ScriptedPresenceProvider};

    #[test]
    fn test_build_requires_providers() {
        let err = ServiceContextBuilder::new()
            .token_store(InMemoryTokenStore::new_shared())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("presence_provider is required"));
    }

    #[test]
    fn test_build_with_defaults() {
        let ctx = ServiceContextBuilder::new()
            .token_store(InMemoryTokenStore::new_shared())
            .presence_provider(Arc::new(ScriptedPresenceProvider::new()))
            .identity_provider(Arc::new(MockIdentityProvider::new()))
            .build()
            .unwrap();

        assert!(ctx.roster().is_empty());
        assert_eq!(ctx.fetch_policy(), &FetchPolicy::default());
        assert!(ctx.identity_provider().is_configured());
    }
}
