//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob;
mod cache;
mod geo;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use blob::{BlobError, BlobStore};
pub use cache::{Cache, CacheError};
pub use geo::{LookupError, PostalCodeLookup};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    AnalyticsRepository, BaseRepository, LikeRepository, ListingRepository, ProfileRepository,
};
