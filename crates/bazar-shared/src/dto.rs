//! Data Transfer Objects - request/response types for the API.
//!
//! Listing payloads use the snake_case field names of the stored rows;
//! the analytics capture endpoint keeps the camelCase body of the
//! original client contract.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_core::domain::{AccountStatus, ListingImage, ListingStatus, PlanTier, Profile};
use bazar_core::feed::FeedItem;

/// Request to register a new profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub phone: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A profile's own view of itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub plan: PlanTier,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            phone: p.phone,
            avatar_url: p.avatar_url,
            city: p.city,
            state: p.state,
            plan: p.plan,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

/// Request to create a listing. Images are uploaded first; the create
/// call carries their URLs in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub cep: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Partial update of an owned listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateListingRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
}

/// Public owner fields embedded in listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub username: String,
    pub phone: String,
    pub avatar_url: Option<String>,
}

/// Image row in listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub id: Uuid,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub position: i32,
}

impl From<ListingImage> for ImageResponse {
    fn from(img: ListingImage) -> Self {
        Self {
            id: img.id,
            image_url: img.image_url,
            thumbnail_url: img.thumbnail_url,
            position: img.position,
        }
    }
}

/// A listing as returned to viewers: row fields plus derived counters,
/// owner summary, images and (for authenticated viewers only) the liked
/// flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub cep: String,
    pub city: String,
    pub state: String,
    pub neighborhood: Option<String>,
    pub status: ListingStatus,
    pub views_count: u64,
    pub likes_count: u64,
    pub whatsapp_clicks: u64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<ImageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<OwnerResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

impl From<FeedItem> for ListingResponse {
    fn from(item: FeedItem) -> Self {
        let l = item.listing;
        Self {
            id: l.id,
            user_id: l.user_id,
            title: l.title,
            description: l.description,
            price: l.price,
            category: l.category.as_str().to_string(),
            cep: l.cep,
            city: l.city,
            state: l.state,
            neighborhood: l.neighborhood,
            status: l.status,
            views_count: item.engagement.views_count,
            likes_count: item.engagement.likes_count,
            whatsapp_clicks: item.engagement.whatsapp_clicks,
            expires_at: l.expires_at,
            created_at: l.created_at,
            updated_at: l.updated_at,
            images: item.images.into_iter().map(Into::into).collect(),
            profile: Some(OwnerResponse {
                id: item.owner.id,
                username: item.owner.username,
                phone: item.owner.phone,
                avatar_url: item.owner.avatar_url,
            }),
            liked: item.liked,
        }
    }
}

/// Feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub listings: Vec<ListingResponse>,
}

/// Sold-toggle result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ListingStatus,
}

/// Like-toggle result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: u64,
}

/// Analytics capture body - camelCase, matching the original client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub listing_id: Uuid,
    pub action: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}
