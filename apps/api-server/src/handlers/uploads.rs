//! Image upload endpoint. Clients upload each image first and pass the
//! returned URLs to the listing create call.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// 5 MB cap per image.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub ext: String,
}

/// POST /api/uploads?ext=jpg
pub async fn upload(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let ext = params.ext.to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(
            "Only jpg, png or webp images are allowed".to_string(),
        ));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }
    if body.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(
            "Image must be at most 5MB".to_string(),
        ));
    }

    let path = format!("{}/{}.{}", identity.user_id, Uuid::new_v4(), ext);
    let url = state.blobs.put(&path, &body).await?;

    Ok(HttpResponse::Created().json(json!({ "url": url })))
}
