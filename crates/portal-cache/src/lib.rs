//! # portal-cache
//!
//! In-memory storage for provider access tokens, keyed by identity.
//!
//! ## Example
//!
//! ```ignore
//! use portal_cache::InMemoryTokenStore;
//! use portal_core::{AccessToken, TokenStore};
//!
//! let store = InMemoryTokenStore::new_shared();
//! store.put(&identity_id, AccessToken::new(identity_id.clone(), "eyJ0...")).await?;
//! let token = store.get(&identity_id).await?;
//! ```

pub mod token;

pub use token::{InMemoryTokenStore, SharedTokenStore};
