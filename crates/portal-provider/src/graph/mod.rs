//! Microsoft Graph presence adapter

mod errors;
mod presence_client;

pub(crate) use errors::body_preview;
pub use presence_client::GraphPresenceProvider;
