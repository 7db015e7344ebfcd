//! Provider wire models - serde structs for Graph and token endpoint payloads

mod presence;
mod token;

pub use presence::{PresenceListModel, PresenceModel, StatusMessageModel};
pub use token::{TokenErrorModel, TokenResponseModel};
