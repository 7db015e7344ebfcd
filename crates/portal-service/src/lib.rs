//! # portal-service
//!
//! Application layer: token handling, batch presence fetching, status
//! aggregation, and the DTOs the HTTP layer serializes.

pub mod dto;
pub mod roster;
pub mod services;

pub use roster::TeamRoster;
pub use services::{
    BatchPresenceFetcher, EngineerStatusAggregator, FetchPolicy, PresenceService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TokenService,
};
