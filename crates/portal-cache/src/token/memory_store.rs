//! Access token storage in process memory.
//!
//! Tokens live only as long as the process; a restart signs everyone out.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use portal_core::{AccessToken, DomainError, IdentityId, StoreResult, TokenStore};

/// Shared handle to a token store
pub type SharedTokenStore = Arc<dyn TokenStore>;

/// Token store backed by a sharded concurrent map
///
/// Each key is guarded by its shard lock, so a put, get and remove on the
/// same identity never interleave, while different identities proceed in
/// parallel.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<IdentityId, AccessToken>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind the shared trait object
    #[must_use]
    pub fn new_shared() -> SharedTokenStore {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, identity_id: &IdentityId, token: AccessToken) -> StoreResult<()> {
        let replaced = self.tokens.insert(identity_id.clone(), token).is_some();

        tracing::debug!(
            identity_id = %identity_id,
            replaced = replaced,
            "Stored access token"
        );

        Ok(())
    }

    async fn get(&self, identity_id: &IdentityId) -> StoreResult<AccessToken> {
        self.tokens
            .get(identity_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::Unauthenticated(identity_id.clone()))
    }

    async fn remove(&self, identity_id: &IdentityId) -> StoreResult<()> {
        if self.tokens.remove(identity_id).is_some() {
            tracing::debug!(identity_id = %identity_id, "Removed access token");
        }
        Ok(())
    }

    async fn remove_if_current(
        &self,
        identity_id: &IdentityId,
        expected: &AccessToken,
    ) -> StoreResult<bool> {
        let removed = self
            .tokens
            .remove_if(identity_id, |_, current| current == expected)
            .is_some();
        if removed {
            tracing::debug!(identity_id = %identity_id, "Removed stale access token");
        }
        Ok(removed)
    }

    async fn contains(&self, identity_id: &IdentityId) -> StoreResult<bool> {
        Ok(self.tokens.contains_key(identity_id))
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.tokens.len())
    }
}
