//! Like toggle handler. Likes are set membership on (user, listing);
//! toggling twice restores the original state.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bazar_shared::dto::LikeResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/listings/{id}/like
pub async fn toggle(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let listing_id = path.into_inner();

    // Liking a vanished listing is a 404, not a dangling row.
    state
        .listings
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    let liked = state.likes.toggle(identity.user_id, listing_id).await?;
    let likes_count = state.likes.count_for(listing_id).await?;

    Ok(HttpResponse::Ok().json(LikeResponse { liked, likes_count }))
}
