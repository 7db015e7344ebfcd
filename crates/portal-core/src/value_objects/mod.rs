//! Value objects - immutable domain primitives

mod display_status;
mod identity_id;

pub use display_status::DisplayStatus;
pub use identity_id::{IdentityId, IdentityIdError};
