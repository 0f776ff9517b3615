use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image attached to a listing, ordered by position. The binary content
/// lives in the blob store; only the URL is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl ListingImage {
    pub fn new(listing_id: Uuid, image_url: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            image_url,
            thumbnail_url: None,
            position,
            created_at: Utc::now(),
        }
    }
}
