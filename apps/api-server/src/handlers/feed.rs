//! Feed handler - the ordered page of active listings, with owner info,
//! images, derived engagement counts and per-viewer like state.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use bazar_core::domain::{Category, EventType, Listing, ListingImage};
use bazar_core::feed::{Engagement, FeedItem, FeedQuery, FeedSort, OwnerSummary};
use bazar_shared::dto::{FeedResponse, ListingResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub category: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
    pub city: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl FeedParams {
    fn into_query(self) -> Result<FeedQuery, AppError> {
        let category = match self.category.as_deref() {
            Some(raw) => Some(
                Category::parse(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {raw}")))?,
            ),
            None => None,
        };
        let sort = match self.sort.as_deref() {
            Some(raw) => FeedSort::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown sort order: {raw}")))?,
            None => FeedSort::default(),
        };
        Ok(FeedQuery {
            category,
            owner: self.user_id,
            city: self.city,
            sort,
            limit: self.limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// GET /api/listings
///
/// Anonymous viewers get the same page, minus any like state.
pub async fn feed(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    params: web::Query<FeedParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().into_query()?;
    let viewer = identity.0.map(|id| id.user_id);

    let listings = state.listings.find_active(&query, Utc::now()).await?;
    let items = assemble(&state, listings, viewer).await?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        listings: items.into_iter().map(ListingResponse::from).collect(),
    }))
}

/// Join listings with their owners, images and derived counters.
///
/// `viewer` scopes the liked flags: `None` (anonymous) leaves them
/// entirely absent, so one viewer's like state can never appear in
/// another viewer's response.
pub(crate) async fn assemble(
    state: &AppState,
    listings: Vec<Listing>,
    viewer: Option<Uuid>,
) -> AppResult<Vec<FeedItem>> {
    let ids: Vec<Uuid> = listings.iter().map(|l| l.id).collect();

    let mut images_by_listing: HashMap<Uuid, Vec<ListingImage>> = HashMap::new();
    for image in state.listings.images_for(&ids).await? {
        images_by_listing
            .entry(image.listing_id)
            .or_default()
            .push(image);
    }

    let mut owner_ids: Vec<Uuid> = listings.iter().map(|l| l.user_id).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();
    let owners_by_id: HashMap<Uuid, _> = state
        .profiles
        .find_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let like_counts = state.likes.counts_for(&ids).await?;
    let view_counts = state.analytics.counts_for(&ids, EventType::View).await?;
    let click_counts = state
        .analytics
        .counts_for(&ids, EventType::WhatsappClick)
        .await?;

    let liked = match viewer {
        Some(user_id) => Some(state.likes.liked_subset(user_id, &ids).await?),
        None => None,
    };

    let mut items = Vec::with_capacity(listings.len());
    for listing in listings {
        let Some(owner) = owners_by_id.get(&listing.user_id) else {
            tracing::warn!(listing_id = %listing.id, "Skipping listing with missing owner profile");
            continue;
        };

        items.push(FeedItem {
            engagement: Engagement {
                views_count: view_counts.get(&listing.id).copied().unwrap_or(0),
                likes_count: like_counts.get(&listing.id).copied().unwrap_or(0),
                whatsapp_clicks: click_counts.get(&listing.id).copied().unwrap_or(0),
            },
            images: images_by_listing.remove(&listing.id).unwrap_or_default(),
            owner: OwnerSummary {
                id: owner.id,
                username: owner.username.clone(),
                phone: owner.phone.clone(),
                avatar_url: owner.avatar_url.clone(),
            },
            liked: liked.as_ref().map(|set| set.contains(&listing.id)),
            listing,
        });
    }
    Ok(items)
}
