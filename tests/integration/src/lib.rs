//! Integration test utilities for the presence portal
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API with a scripted presence provider.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
