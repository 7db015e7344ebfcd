//! Business logic services
//!
//! Token lifecycle, provider fetching with failure isolation, and roster
//! aggregation.

pub mod aggregator;
pub mod batch_fetcher;
pub mod context;
pub mod error;
pub mod presence;
pub mod token;

// Re-export all services for convenience
pub use aggregator::EngineerStatusAggregator;
pub use batch_fetcher::{BatchPresenceFetcher, FetchPolicy};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use presence::PresenceService;
pub use token::TokenService;
