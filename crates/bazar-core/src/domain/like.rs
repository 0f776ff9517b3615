use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like - join record between a profile and a listing.
/// At most one per (user, listing) pair; liking is set membership,
/// never a counter increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, listing_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            listing_id,
            created_at: Utc::now(),
        }
    }
}
