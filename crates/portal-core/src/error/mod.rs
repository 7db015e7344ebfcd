//! Domain error types

mod domain_error;
mod provider_error;

pub use domain_error::DomainError;
pub use provider_error::{AuthError, ProviderError};
