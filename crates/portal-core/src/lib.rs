//! # portal-core
//!
//! Domain layer of the team portal presence service: identities, raw and
//! classified presence, the status classifier, and the ports the service
//! layer depends on. No infrastructure dependencies (HTTP, storage).

pub mod classifier;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use classifier::{classify, classify_presence};
pub use entities::{
    AccessToken, Activity, Availability, EngineerStatus, Identity, RawPresence, RosterView,
    MAX_TOKEN_LIFETIME_SECS,
};
pub use error::{AuthError, DomainError, ProviderError};
pub use traits::{
    BatchPresence, IdentityProvider, PresenceLookup, PresenceProvider, ProviderResult,
    StoreResult, TokenStore,
};
pub use value_objects::{DisplayStatus, IdentityId, IdentityIdError};
