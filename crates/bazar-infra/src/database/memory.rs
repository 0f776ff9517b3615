//! In-memory repository suite - used as the fallback when no database is
//! configured (demo mode). Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use bazar_core::domain::{
    AnalyticsEvent, EventType, Like, Listing, ListingImage, ListingStatus, Profile,
};
use bazar_core::error::RepoError;
use bazar_core::feed::{FeedQuery, FeedSort};
use bazar_core::ports::{
    AnalyticsRepository, BaseRepository, LikeRepository, ListingRepository, ProfileRepository,
};

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    listings: HashMap<Uuid, Listing>,
    images: HashMap<Uuid, ListingImage>,
    likes: HashMap<Uuid, Like>,
    events: Vec<AnalyticsEvent>,
}

impl Tables {
    fn active_count(&self, user_id: Uuid) -> u64 {
        self.listings
            .values()
            .filter(|l| l.user_id == user_id && l.status == ListingStatus::Active)
            .count() as u64
    }

    fn like_count(&self, listing_id: Uuid) -> u64 {
        self.likes
            .values()
            .filter(|like| like.listing_id == listing_id)
            .count() as u64
    }
}

/// One store implements every repository port. All mutations take the
/// single write lock, which gives the same check-and-insert atomicity
/// the Postgres repositories get from transactions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Profile, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn insert(&self, entity: Profile) -> Result<Profile, RepoError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.profiles.contains_key(&entity.id)
            || tables
                .profiles
                .values()
                .any(|p| p.email == entity.email || p.username == entity.username);
        if duplicate {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.profiles.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Profile) -> Result<Profile, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.profiles.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.profiles.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.values().find(|p| p.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.profiles.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Listing, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, RepoError> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn insert(&self, entity: Listing) -> Result<Listing, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.listings.contains_key(&entity.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.listings.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Listing) -> Result<Listing, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.listings.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.listings.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.listings.remove(&id).ok_or(RepoError::NotFound)?;
        // Cascade like the database foreign keys do.
        tables.images.retain(|_, img| img.listing_id != id);
        tables.likes.retain(|_, like| like.listing_id != id);
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn create_quota_checked(
        &self,
        new_listing: Listing,
        images: Vec<ListingImage>,
        limit: u64,
    ) -> Result<Listing, RepoError> {
        let mut tables = self.tables.write().await;

        let current = tables.active_count(new_listing.user_id);
        if current >= limit {
            return Err(RepoError::QuotaExceeded { current, limit });
        }

        tables.listings.insert(new_listing.id, new_listing.clone());
        for image in images {
            tables.images.insert(image.id, image);
        }
        Ok(new_listing)
    }

    async fn count_active_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.active_count(user_id))
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, RepoError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<Listing> = tables
            .listings
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn find_active(
        &self,
        query: &FeedQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Listing>, RepoError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<Listing> = tables
            .listings
            .values()
            .filter(|l| l.status == ListingStatus::Active && l.expires_at > now)
            .filter(|l| query.category.is_none_or(|c| l.category == c))
            .filter(|l| query.owner.is_none_or(|owner| l.user_id == owner))
            .filter(|l| query.city.as_ref().is_none_or(|city| &l.city == city))
            .cloned()
            .collect();

        match query.sort {
            FeedSort::Recent => listings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            FeedSort::Popular => listings.sort_by(|a, b| {
                tables
                    .like_count(b.id)
                    .cmp(&tables.like_count(a.id))
                    .then(b.created_at.cmp(&a.created_at))
            }),
        }

        Ok(listings
            .into_iter()
            .skip(query.offset as usize)
            .take(query.page_size() as usize)
            .collect())
    }

    async fn images_for(&self, listing_ids: &[Uuid]) -> Result<Vec<ListingImage>, RepoError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<Uuid> = listing_ids.iter().copied().collect();
        let mut images: Vec<ListingImage> = tables
            .images
            .values()
            .filter(|img| wanted.contains(&img.listing_id))
            .cloned()
            .collect();
        images.sort_by_key(|img| img.position);
        Ok(images)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let mut flipped = 0;
        for listing in tables.listings.values_mut() {
            if listing.status == ListingStatus::Active && listing.expires_at <= now {
                listing.status = ListingStatus::Expired;
                listing.updated_at = now;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn toggle(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .likes
            .values()
            .find(|like| like.user_id == user_id && like.listing_id == listing_id)
            .map(|like| like.id);

        match existing {
            Some(id) => {
                tables.likes.remove(&id);
                Ok(false)
            }
            None => {
                let like = Like::new(user_id, listing_id);
                tables.likes.insert(like.id, like);
                Ok(true)
            }
        }
    }

    async fn is_liked(&self, user_id: Uuid, listing_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .any(|like| like.user_id == user_id && like.listing_id == listing_id))
    }

    async fn liked_subset(
        &self,
        user_id: Uuid,
        listing_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<Uuid> = listing_ids.iter().copied().collect();
        Ok(tables
            .likes
            .values()
            .filter(|like| like.user_id == user_id && wanted.contains(&like.listing_id))
            .map(|like| like.listing_id)
            .collect())
    }

    async fn count_for(&self, listing_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.like_count(listing_id))
    }

    async fn counts_for(&self, listing_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<Uuid> = listing_ids.iter().copied().collect();
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for like in tables.likes.values() {
            if wanted.contains(&like.listing_id) {
                *counts.entry(like.listing_id).or_default() += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn append(&self, event: AnalyticsEvent) -> Result<AnalyticsEvent, RepoError> {
        let mut tables = self.tables.write().await;
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn count_for(&self, listing_id: Uuid, event_type: EventType) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .filter(|e| e.listing_id == Some(listing_id) && e.event_type == event_type)
            .count() as u64)
    }

    async fn counts_for(
        &self,
        listing_ids: &[Uuid],
        event_type: EventType,
    ) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<Uuid> = listing_ids.iter().copied().collect();
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for event in &tables.events {
            if event.event_type != event_type {
                continue;
            }
            if let Some(listing_id) = event.listing_id {
                if wanted.contains(&listing_id) {
                    *counts.entry(listing_id).or_default() += 1;
                }
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazar_core::domain::{Category, Location, NewListing, PlanTier, quota};
    use rust_decimal::Decimal;

    fn new_listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: None,
            price: Decimal::new(9900, 2),
            category: Category::Moveis,
            location: Location {
                cep: "01310100".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                neighborhood: None,
            },
        }
    }

    fn active_listing(user_id: Uuid, title: &str) -> Listing {
        Listing::create(user_id, new_listing(title), PlanTier::Free).unwrap()
    }

    #[tokio::test]
    async fn quota_rejects_fourth_listing_on_free_plan() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let limit = quota::active_listing_limit(PlanTier::Free);

        for i in 0..3 {
            store
                .create_quota_checked(active_listing(user_id, &format!("Listing {i}")), vec![], limit)
                .await
                .unwrap();
        }

        let err = store
            .create_quota_checked(active_listing(user_id, "One too many"), vec![], limit)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::QuotaExceeded {
                current: 3,
                limit: 3
            }
        ));

        // Nothing was persisted by the rejected create.
        assert_eq!(store.count_active_by_owner(user_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn quota_counts_only_active_listings() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let limit = quota::active_listing_limit(PlanTier::Free);

        let mut sold = active_listing(user_id, "Sold already");
        sold.toggle_sold().unwrap();
        BaseRepository::<Listing, Uuid>::insert(&store, sold)
            .await
            .unwrap();

        for i in 0..3 {
            store
                .create_quota_checked(active_listing(user_id, &format!("Listing {i}")), vec![], limit)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn feed_excludes_overdue_listings() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let listing = active_listing(user_id, "Still fresh");
        let deadline = listing.expires_at;
        store
            .create_quota_checked(listing, vec![], 3)
            .await
            .unwrap();

        let query = FeedQuery::default();
        assert_eq!(store.find_active(&query, Utc::now()).await.unwrap().len(), 1);
        assert_eq!(store.find_active(&query, deadline).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn popular_sort_orders_by_like_count() {
        let store = InMemoryStore::new();
        let seller = Uuid::new_v4();
        let quiet = active_listing(seller, "Quiet listing");
        let popular = active_listing(seller, "Popular listing");
        store
            .create_quota_checked(quiet.clone(), vec![], 10)
            .await
            .unwrap();
        store
            .create_quota_checked(popular.clone(), vec![], 10)
            .await
            .unwrap();

        store.toggle(Uuid::new_v4(), popular.id).await.unwrap();
        store.toggle(Uuid::new_v4(), popular.id).await.unwrap();
        store.toggle(Uuid::new_v4(), quiet.id).await.unwrap();

        let query = FeedQuery {
            sort: FeedSort::Popular,
            ..Default::default()
        };
        let feed = store.find_active(&query, Utc::now()).await.unwrap();
        assert_eq!(feed[0].id, popular.id);
        assert_eq!(feed[1].id, quiet.id);
    }

    #[tokio::test]
    async fn like_toggle_is_set_membership() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let listing_id = Uuid::new_v4();

        assert!(store.toggle(user_id, listing_id).await.unwrap());
        assert_eq!(
            LikeRepository::count_for(&store, listing_id).await.unwrap(),
            1
        );
        assert!(!store.toggle(user_id, listing_id).await.unwrap());
        assert_eq!(
            LikeRepository::count_for(&store, listing_id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn expire_overdue_flips_only_past_deadline_rows() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let listing = active_listing(user_id, "About to lapse");
        let deadline = listing.expires_at;
        store
            .create_quota_checked(listing.clone(), vec![], 3)
            .await
            .unwrap();

        assert_eq!(store.expire_overdue(Utc::now()).await.unwrap(), 0);
        assert_eq!(store.expire_overdue(deadline).await.unwrap(), 1);

        let stored = BaseRepository::<Listing, Uuid>::find_by_id(&store, listing.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ListingStatus::Expired);
    }

    #[tokio::test]
    async fn deleting_listing_cascades_images_and_likes() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let listing = active_listing(user_id, "Short lived");
        let image = ListingImage::new(listing.id, "http://blob/img0.jpg".to_string(), 0);
        store
            .create_quota_checked(listing.clone(), vec![image], 3)
            .await
            .unwrap();
        store.toggle(Uuid::new_v4(), listing.id).await.unwrap();

        BaseRepository::<Listing, Uuid>::delete(&store, listing.id)
            .await
            .unwrap();

        assert!(store.images_for(&[listing.id]).await.unwrap().is_empty());
        assert_eq!(
            LikeRepository::count_for(&store, listing.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn concurrent_contact_clicks_are_both_counted() {
        let store = InMemoryStore::new();
        let listing_id = Uuid::new_v4();

        let (a, b) = tokio::join!(
            store.append(AnalyticsEvent::new(
                EventType::WhatsappClick,
                Some(listing_id),
                None
            )),
            store.append(AnalyticsEvent::new(
                EventType::WhatsappClick,
                Some(listing_id),
                None
            )),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(
            AnalyticsRepository::count_for(&store, listing_id, EventType::WhatsappClick)
                .await
                .unwrap(),
            2
        );
    }
}
