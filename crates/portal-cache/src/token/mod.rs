//! Token storage module.

mod memory_store;

pub use memory_store::{InMemoryTokenStore, SharedTokenStore};
