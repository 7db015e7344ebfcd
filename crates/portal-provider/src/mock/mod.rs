//! In-process providers for local runs and tests

mod scripted;

pub use scripted::{MockIdentityProvider, ScriptedPresenceProvider};
