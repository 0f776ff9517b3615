//! Analytics capture endpoint.
//!
//! Every engagement is appended as an immutable event row; displayed
//! counters are derived by counting. Nothing here ever increments a
//! stored integer, so concurrent clicks cannot lose updates.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use bazar_core::domain::{AnalyticsEvent, EventType};
use bazar_shared::dto::AnalyticsRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/analytics
///
/// Contact clicks come from viewers who may not be signed in, so the
/// endpoint accepts anonymous requests and sits behind the rate limiter.
pub async fn capture(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AnalyticsRequest>,
) -> AppResult<HttpResponse> {
    let client_key = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let check = state
        .limiter
        .check(&client_key)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !check.allowed {
        return Err(AppError::TooManyRequests);
    }

    let req = body.into_inner();

    let event_type = EventType::parse(&req.action)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid action: {}", req.action)))?;

    state
        .listings
        .find_by_id(req.listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

    state
        .analytics
        .append(AnalyticsEvent::new(
            event_type,
            Some(req.listing_id),
            req.user_id,
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
