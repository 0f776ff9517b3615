//! # Bazar Infrastructure
//!
//! Concrete implementations of the ports defined in `bazar-core`.
//! This crate contains the database repositories, authentication
//! services, blob storage, postal-code lookup and their in-memory
//! fallbacks.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory repositories only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor

pub mod blob;
pub mod cache;
pub mod database;
pub mod geo;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::InMemoryStore;

// Re-exports - external services
pub use blob::FsBlobStore;
pub use geo::{CachedPostalLookup, ViaCepClient};
