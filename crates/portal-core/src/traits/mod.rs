//! Ports implemented by infrastructure crates

mod ports;

pub use ports::{
    BatchPresence, IdentityProvider, PresenceLookup, PresenceProvider, ProviderResult,
    StoreResult, TokenStore,
};
