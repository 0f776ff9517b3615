//! Listing lifecycle handlers: create (quota-checked), read, update,
//! delete, sold toggle and renewal.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use bazar_core::domain::{
    Category, Listing, ListingImage, ListingStatus, Location, NewListing, Profile, quota,
};
use bazar_shared::dto::{
    CreateListingRequest, FeedResponse, ListingResponse, StatusResponse, UpdateListingRequest,
};

use crate::handlers::feed::assemble;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, AppError> {
    state
        .profiles
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// Fetch a listing and enforce ownership for owner-only operations.
async fn load_owned(state: &AppState, id: Uuid, user_id: Uuid) -> Result<Listing, AppError> {
    let listing = state
        .listings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    if !listing.is_owned_by(user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(listing)
}

/// Assemble one listing into its full response shape.
async fn respond_single(
    state: &AppState,
    listing: Listing,
    viewer: Option<Uuid>,
) -> Result<ListingResponse, AppError> {
    let items = assemble(state, vec![listing], viewer).await?;
    items
        .into_iter()
        .next()
        .map(ListingResponse::from)
        .ok_or_else(|| AppError::Internal("Listing owner profile missing".to_string()))
}

/// POST /api/listings
///
/// Quota is enforced transactionally in the repository; the limit itself
/// comes from the owner's plan. Only `create` is quota-gated.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateListingRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let category = Category::parse(&req.category)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", req.category)))?;

    let profile = load_profile(&state, identity.user_id).await?;
    if !profile.is_active() {
        return Err(AppError::Forbidden);
    }

    let input = NewListing {
        title: req.title,
        description: req.description.filter(|d| !d.is_empty()),
        price: req.price,
        category,
        location: Location {
            cep: req.cep,
            city: req.city,
            state: req.state,
            neighborhood: req.neighborhood,
        },
    };

    let listing = Listing::create(identity.user_id, input, profile.plan)?;

    let images: Vec<ListingImage> = req
        .image_urls
        .iter()
        .enumerate()
        .map(|(position, url)| ListingImage::new(listing.id, url.clone(), position as i32))
        .collect();

    let limit = quota::active_listing_limit(profile.plan);
    let created = state
        .listings
        .create_quota_checked(listing, images, limit)
        .await?;

    tracing::info!(listing_id = %created.id, user_id = %identity.user_id, "Listing created");

    let response = respond_single(&state, created, Some(identity.user_id)).await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/listings/{id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut listing = state
        .listings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    // Lazy expiration: a read past the deadline observes (and persists)
    // the expired state without waiting for the sweep.
    let now = Utc::now();
    if listing.status == ListingStatus::Active && listing.is_past_deadline(now) {
        listing.expire(now)?;
        if let Err(e) = state.listings.update(listing.clone()).await {
            tracing::warn!(listing_id = %id, error = %e, "Failed to persist lazy expiration");
        }
    }

    let viewer = identity.0.map(|i| i.user_id);
    let response = respond_single(&state, listing, viewer).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/listings/{id} - owner-only partial update.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateListingRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut listing = load_owned(&state, path.into_inner(), identity.user_id).await?;

    if let Some(title) = req.title {
        listing.title = title;
    }
    if let Some(description) = req.description {
        listing.description = (!description.is_empty()).then_some(description);
    }
    if let Some(price) = req.price {
        listing.price = price;
    }
    if let Some(category) = req.category {
        listing.category = Category::parse(&category)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {category}")))?;
    }
    if let Some(cep) = req.cep {
        listing.cep = cep;
    }
    if let Some(city) = req.city {
        listing.city = city;
    }
    if let Some(state_code) = req.state {
        listing.state = state_code;
    }
    if let Some(neighborhood) = req.neighborhood {
        listing.neighborhood = (!neighborhood.is_empty()).then_some(neighborhood);
    }

    listing.validate()?;
    listing.updated_at = Utc::now();

    let updated = state.listings.update(listing).await?;
    let response = respond_single(&state, updated, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/listings/{id}
///
/// Hard delete: image and like rows cascade with the listing; the image
/// blobs are removed best-effort afterwards.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    load_owned(&state, id, identity.user_id).await?;

    let images = state.listings.images_for(&[id]).await?;

    state.listings.delete(id).await?;
    tracing::info!(listing_id = %id, user_id = %identity.user_id, "Listing deleted");

    let prefix = format!("{}/", state.uploads_base_url.trim_end_matches('/'));
    let blob_paths: Vec<String> = images
        .iter()
        .filter_map(|img| img.image_url.strip_prefix(&prefix))
        .map(str::to_string)
        .collect();
    if !blob_paths.is_empty() {
        if let Err(e) = state.blobs.remove(&blob_paths).await {
            tracing::warn!(listing_id = %id, error = %e, "Blob cleanup failed");
        }
    }

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/listings/{id}/sold - owner toggle, reversible, no quota
/// re-check on un-sell.
pub async fn toggle_sold(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut listing = load_owned(&state, path.into_inner(), identity.user_id).await?;

    let status = listing.toggle_sold()?;
    state.listings.update(listing).await?;

    Ok(HttpResponse::Ok().json(StatusResponse { status }))
}

/// POST /api/listings/{id}/renew - reset the deadline from the owner's
/// current plan and reactivate.
pub async fn renew(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut listing = load_owned(&state, path.into_inner(), identity.user_id).await?;
    let profile = load_profile(&state, identity.user_id).await?;

    listing.renew(profile.plan)?;
    let renewed = state.listings.update(listing).await?;

    let response = respond_single(&state, renewed, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/me/listings - the owner's dashboard, every status included.
pub async fn my_listings(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let mut listings = state.listings.find_by_owner(identity.user_id).await?;

    // Dashboard shows the lazy-expiration view without persisting it.
    let now = Utc::now();
    for listing in &mut listings {
        listing.status = listing.effective_status(now);
    }

    let items = assemble(&state, listings, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(FeedResponse {
        listings: items.into_iter().map(ListingResponse::from).collect(),
    }))
}
