//! Domain entities

mod access_token;
mod engineer_status;
mod identity;
mod presence;

pub use access_token::{AccessToken, MAX_TOKEN_LIFETIME_SECS};
pub use engineer_status::{EngineerStatus, RosterView};
pub use identity::Identity;
pub use presence::{Activity, Availability, RawPresence};
