//! Feed types - the ordered, filtered page of active listings shown to
//! a viewer, with owner info, images and derived engagement counts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Listing, ListingImage};

/// Hard page-size cap for the feed.
pub const MAX_PAGE_SIZE: u64 = 50;

/// Feed ordering. Recency is the default; popularity is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    #[default]
    Recent,
    Popular,
}

impl FeedSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(Self::Recent),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }
}

/// Filters and pagination for a feed read.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub category: Option<Category>,
    pub owner: Option<Uuid>,
    pub city: Option<String>,
    pub sort: FeedSort,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl FeedQuery {
    /// Effective page size: requested, clamped to the cap.
    pub fn page_size(&self) -> u64 {
        self.limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Owner fields exposed publicly on every feed item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub phone: String,
    pub avatar_url: Option<String>,
}

/// Derived engagement counts. Computed from the likes relation and the
/// analytics event log, never from stored counter columns.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub views_count: u64,
    pub likes_count: u64,
    pub whatsapp_clicks: u64,
}

/// One assembled feed entry.
///
/// `liked` is populated only for authenticated viewers; an anonymous
/// feed carries no like state at all.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub listing: Listing,
    pub images: Vec<ListingImage>,
    pub owner: OwnerSummary,
    pub engagement: Engagement,
    pub liked: Option<bool>,
}
