//! Database repositories: Postgres via SeaORM, plus the in-memory
//! store used when no database is configured (demo mode).

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;

#[cfg(feature = "postgres")]
pub mod entity;

#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use connections::DatabaseConfig;
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::connect;

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAnalyticsRepository, PostgresLikeRepository, PostgresListingRepository,
    PostgresProfileRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
