use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AnalyticsEvent, EventType, Listing, ListingImage, Profile};
use crate::error::RepoError;
use crate::feed::FeedQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity; [`RepoError::NotFound`] if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Profile repository with domain-specific lookups.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, RepoError>;

    /// Batch lookup for feed assembly; missing ids are simply absent.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, RepoError>;
}

/// Listing repository.
///
/// Creation goes through [`create_quota_checked`](Self::create_quota_checked)
/// rather than `save`: the active-listing count and the insert must happen
/// inside one transaction so two concurrent creates cannot both pass the
/// quota check.
#[async_trait]
pub trait ListingRepository: BaseRepository<Listing, Uuid> {
    /// Transactional check-and-insert: counts the owner's active listings,
    /// fails with [`RepoError::QuotaExceeded`] at `limit`, otherwise inserts
    /// the listing and its image rows. An image insert failure rolls the
    /// listing back; no half-created listing ever becomes visible.
    async fn create_quota_checked(
        &self,
        listing: Listing,
        images: Vec<ListingImage>,
        limit: u64,
    ) -> Result<Listing, RepoError>;

    /// Number of listings with `status = active` owned by `user_id`.
    async fn count_active_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError>;

    /// All of an owner's listings, newest first, any status.
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, RepoError>;

    /// Active, unexpired listings matching the feed query, ordered and
    /// paginated. The deadline filter (`expires_at > now`) is applied
    /// here so lapsed rows never surface, swept or not.
    async fn find_active(
        &self,
        query: &FeedQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Listing>, RepoError>;

    /// Image rows for a set of listings, position-ordered.
    async fn images_for(&self, listing_ids: &[Uuid]) -> Result<Vec<ListingImage>, RepoError>;

    /// Flip `active` listings whose deadline has passed to `expired`.
    /// Returns the number of rows flipped. Used by the sweep job.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;
}

/// Like repository - set membership, not counters.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Toggle the (user, listing) like. Returns whether the listing is
    /// liked after the call.
    async fn toggle(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError>;

    async fn is_liked(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError>;

    /// Of the given listings, the subset the user has liked.
    async fn liked_subset(
        &self,
        user_id: Uuid,
        listing_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError>;

    async fn count_for(&self, listing_id: Uuid) -> Result<u64, RepoError>;

    /// Like counts per listing; listings without likes are absent.
    async fn counts_for(&self, listing_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;
}

/// Analytics event repository - append-only.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn append(&self, event: AnalyticsEvent) -> Result<AnalyticsEvent, RepoError>;

    async fn count_for(&self, listing_id: Uuid, event_type: EventType) -> Result<u64, RepoError>;

    /// Event counts of one type per listing; listings without events are
    /// absent.
    async fn counts_for(
        &self,
        listing_ids: &[Uuid],
        event_type: EventType,
    ) -> Result<HashMap<Uuid, u64>, RepoError>;
}
