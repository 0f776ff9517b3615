//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use bazar_core::ports::{
    AnalyticsRepository, BlobStore, LikeRepository, ListingRepository, PostalCodeLookup,
    ProfileRepository, RateLimiter,
};
use bazar_infra::cache::InMemoryCache;
use bazar_infra::database::InMemoryStore;
use bazar_infra::database::{
    PostgresAnalyticsRepository, PostgresLikeRepository, PostgresListingRepository,
    PostgresProfileRepository, connect,
};
use bazar_infra::geo::{CachedPostalLookup, ViaCepClient};
use bazar_infra::rate_limit::InMemoryRateLimiter;
use bazar_infra::FsBlobStore;

use crate::config::AppConfig;

const CEP_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub blobs: Arc<dyn BlobStore>,
    pub postal: Arc<dyn PostalCodeLookup>,
    pub limiter: Arc<dyn RateLimiter>,
    pub uploads_base_url: String,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => {
                    let conn = Arc::new(conn);
                    Some(Repos {
                        profiles: Arc::new(PostgresProfileRepository::new(conn.clone())),
                        listings: Arc::new(PostgresListingRepository::new(conn.clone())),
                        likes: Arc::new(PostgresLikeRepository::new(conn.clone())),
                        analytics: Arc::new(PostgresAnalyticsRepository::new(conn)),
                    })
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    None
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (demo mode).");
                None
            }
        };

        let repos = repos.unwrap_or_else(|| {
            let store = InMemoryStore::new();
            Repos {
                profiles: Arc::new(store.clone()),
                listings: Arc::new(store.clone()),
                likes: Arc::new(store.clone()),
                analytics: Arc::new(store),
            }
        });

        let postal: Arc<dyn PostalCodeLookup> = Arc::new(CachedPostalLookup::new(
            Arc::new(ViaCepClient::new()),
            Arc::new(InMemoryCache::new()),
            CEP_CACHE_TTL,
        ));

        tracing::info!("Application state initialized");

        Self {
            profiles: repos.profiles,
            listings: repos.listings,
            likes: repos.likes,
            analytics: repos.analytics,
            blobs: Arc::new(FsBlobStore::new(
                config.uploads_dir.clone(),
                config.uploads_base_url.clone(),
            )),
            postal,
            limiter: Arc::new(InMemoryRateLimiter::from_env()),
            uploads_base_url: config.uploads_base_url.clone(),
        }
    }
}

struct Repos {
    profiles: Arc<dyn ProfileRepository>,
    listings: Arc<dyn ListingRepository>,
    likes: Arc<dyn LikeRepository>,
    analytics: Arc<dyn AnalyticsRepository>,
}
