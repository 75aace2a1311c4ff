//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//! This crate contains the database adapters, SeaORM repositories and the rate limiter.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Database only
//! - `rate-limit` - Rate limiting via governor

pub mod database;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::{
    AdapterError, BackendType, ContentSchema, DatabaseAdapter, DatabaseConfig, Dialect,
    create_adapter, repositories,
};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
