//! Postal-code lookup passthrough for the listing form.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/cep/{cep}
pub async fn lookup(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let cep = path.into_inner();

    let location = state
        .postal
        .lookup(&cep)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Postal code {cep} not found")))?;

    Ok(HttpResponse::Ok().json(location))
}
