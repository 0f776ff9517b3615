//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use bazar_core::domain::Profile;
use bazar_core::ports::{PasswordService, TokenService};
use bazar_shared::dto::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 6;

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < PASSWORD_MIN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }
    let username_len = req.username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len)
        || !req
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::BadRequest(
            "Username must be 3-30 characters of letters, digits or underscore".to_string(),
        ));
    }
    let phone_digits = req.phone.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&phone_digits) {
        return Err(AppError::BadRequest("Invalid phone number".to_string()));
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_registration(&req)?;

    // Check availability of both unique handles
    if state.profiles.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state
        .profiles
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password
    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Create profile
    let profile = Profile::new(req.username, req.email, password_hash, req.phone);
    let saved = state.profiles.insert(profile).await?;

    // Generate token
    let token = token_service
        .generate_token(saved.id, &saved.username, vec!["user".to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Find profile by email
    let profile = state
        .profiles
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let valid = password_service
        .verify(&req.password, &profile.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    // Suspended and banned accounts keep their data but cannot sign in
    if !profile.is_active() {
        return Err(AppError::Forbidden);
    }

    // Generate token
    let token = token_service
        .generate_token(profile.id, &profile.username, vec!["user".to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state
        .profiles
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}
