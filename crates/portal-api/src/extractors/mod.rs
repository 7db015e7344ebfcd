//! Axum extractors for request handling
//!
//! Custom extractors for the caller identity and validated JSON bodies.

mod identity;
mod validated;

pub use identity::{CallerIdentity, XIdentityId, IDENTITY_HEADER};
pub use validated::ValidatedJson;
