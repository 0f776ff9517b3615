//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use bazar_core::domain::{
    AnalyticsEvent, EventType, Like, Listing, ListingImage, ListingStatus, Profile,
};
use bazar_core::error::RepoError;
use bazar_core::feed::{FeedQuery, FeedSort};
use bazar_core::ports::{AnalyticsRepository, LikeRepository, ListingRepository, ProfileRepository};

use super::entity::analytics_event::{self, Entity as EventEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::listing::{self, Entity as ListingEntity};
use super::entity::listing_image::{self, Entity as ImageEntity};
use super::entity::profile::{self, Entity as ProfileEntity};
use super::postgres_base::{PostgresBaseRepository, map_write_err};

/// PostgreSQL profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

/// PostgreSQL listing repository.
pub type PostgresListingRepository = PostgresBaseRepository<ListingEntity>;

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn is_unique_violation(e: &DbErr) -> bool {
    let err_str = e.to_string();
    err_str.contains("duplicate") || err_str.contains("unique")
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding profile by email");

        let result = ProfileEntity::find()
            .filter(profile::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, RepoError> {
        let result = ProfileEntity::find()
            .filter(profile::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = ProfileEntity::find()
            .filter(profile::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn create_quota_checked(
        &self,
        new_listing: Listing,
        images: Vec<ListingImage>,
        limit: u64,
    ) -> Result<Listing, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let current = ListingEntity::find()
            .filter(listing::Column::UserId.eq(new_listing.user_id))
            .filter(listing::Column::Status.eq(ListingStatus::Active.as_str()))
            .count(&txn)
            .await
            .map_err(query_err)?;

        if current >= limit {
            txn.rollback().await.ok();
            return Err(RepoError::QuotaExceeded { current, limit });
        }

        let active_model: listing::ActiveModel = new_listing.clone().into();
        active_model.insert(&txn).await.map_err(map_write_err)?;

        // Image rows ride the same transaction: a failure here rolls the
        // listing back instead of leaving it visible without its images.
        if !images.is_empty() {
            let image_models = images
                .into_iter()
                .map(listing_image::ActiveModel::from)
                .collect::<Vec<_>>();
            ImageEntity::insert_many(image_models)
                .exec(&txn)
                .await
                .map_err(map_write_err)?;
        }

        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(new_listing)
    }

    async fn count_active_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        ListingEntity::find()
            .filter(listing::Column::UserId.eq(user_id))
            .filter(listing::Column::Status.eq(ListingStatus::Active.as_str()))
            .count(self.db.as_ref())
            .await
            .map_err(query_err)
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, RepoError> {
        let result = ListingEntity::find()
            .filter(listing::Column::UserId.eq(user_id))
            .order_by_desc(listing::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_active(
        &self,
        query: &FeedQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Listing>, RepoError> {
        let mut select = ListingEntity::find()
            .filter(listing::Column::Status.eq(ListingStatus::Active.as_str()))
            .filter(listing::Column::ExpiresAt.gt(now));

        if let Some(category) = query.category {
            select = select.filter(listing::Column::Category.eq(category.as_str()));
        }
        if let Some(owner) = query.owner {
            select = select.filter(listing::Column::UserId.eq(owner));
        }
        if let Some(city) = &query.city {
            select = select.filter(listing::Column::City.eq(city.clone()));
        }

        select = match query.sort {
            FeedSort::Recent => select.order_by_desc(listing::Column::CreatedAt),
            FeedSort::Popular => select
                .order_by(
                    Expr::cust("(SELECT COUNT(*) FROM likes WHERE likes.listing_id = listings.id)"),
                    Order::Desc,
                )
                .order_by_desc(listing::Column::CreatedAt),
        };

        let result = select
            .offset(query.offset)
            .limit(query.page_size())
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn images_for(&self, listing_ids: &[Uuid]) -> Result<Vec<ListingImage>, RepoError> {
        if listing_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = ImageEntity::find()
            .filter(listing_image::Column::ListingId.is_in(listing_ids.iter().copied()))
            .order_by_asc(listing_image::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = ListingEntity::update_many()
            .col_expr(
                listing::Column::Status,
                Expr::value(ListingStatus::Expired.as_str()),
            )
            .col_expr(listing::Column::UpdatedAt, Expr::value(now))
            .filter(listing::Column::Status.eq(ListingStatus::Active.as_str()))
            .filter(listing::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected)
    }
}

/// PostgreSQL like repository.
pub struct PostgresLikeRepository {
    db: Arc<DbConn>,
}

impl PostgresLikeRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn toggle(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError> {
        let existing = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ListingId.eq(listing_id))
            .one(self.db.as_ref())
            .await
            .map_err(query_err)?;

        match existing {
            Some(row) => {
                LikeEntity::delete_by_id(row.id)
                    .exec(self.db.as_ref())
                    .await
                    .map_err(query_err)?;
                Ok(false)
            }
            None => {
                let active_model: like::ActiveModel = Like::new(user_id, listing_id).into();
                match active_model.insert(self.db.as_ref()).await {
                    Ok(_) => Ok(true),
                    // Lost a race against a concurrent like from the same
                    // user; the unique index kept membership intact.
                    Err(ref e) if is_unique_violation(e) => Ok(true),
                    Err(e) => Err(query_err(e)),
                }
            }
        }
    }

    async fn is_liked(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError> {
        let count = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ListingId.eq(listing_id))
            .count(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(count > 0)
    }

    async fn liked_subset(
        &self,
        user_id: Uuid,
        listing_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        if listing_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<Uuid> = LikeEntity::find()
            .select_only()
            .column(like::Column::ListingId)
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ListingId.is_in(listing_ids.iter().copied()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().collect())
    }

    async fn count_for(&self, listing_id: Uuid) -> Result<u64, RepoError> {
        LikeEntity::find()
            .filter(like::Column::ListingId.eq(listing_id))
            .count(self.db.as_ref())
            .await
            .map_err(query_err)
    }

    async fn counts_for(&self, listing_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        if listing_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = LikeEntity::find()
            .select_only()
            .column(like::Column::ListingId)
            .column_as(like::Column::Id.count(), "count")
            .filter(like::Column::ListingId.is_in(listing_ids.iter().copied()))
            .group_by(like::Column::ListingId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
    }
}

/// PostgreSQL analytics event repository.
pub struct PostgresAnalyticsRepository {
    db: Arc<DbConn>,
}

impl PostgresAnalyticsRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnalyticsRepository for PostgresAnalyticsRepository {
    async fn append(&self, event: AnalyticsEvent) -> Result<AnalyticsEvent, RepoError> {
        let active_model: analytics_event::ActiveModel = event.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_write_err)?;
        Ok(model.into())
    }

    async fn count_for(&self, listing_id: Uuid, event_type: EventType) -> Result<u64, RepoError> {
        EventEntity::find()
            .filter(analytics_event::Column::ListingId.eq(listing_id))
            .filter(analytics_event::Column::EventType.eq(event_type.as_str()))
            .count(self.db.as_ref())
            .await
            .map_err(query_err)
    }

    async fn counts_for(
        &self,
        listing_ids: &[Uuid],
        event_type: EventType,
    ) -> Result<HashMap<Uuid, u64>, RepoError> {
        if listing_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = EventEntity::find()
            .select_only()
            .column(analytics_event::Column::ListingId)
            .column_as(analytics_event::Column::Id.count(), "count")
            .filter(analytics_event::Column::ListingId.is_in(listing_ids.iter().copied()))
            .filter(analytics_event::Column::EventType.eq(event_type.as_str()))
            .group_by(analytics_event::Column::ListingId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
    }
}
