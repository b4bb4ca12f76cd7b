use std::sync::Arc;

use actix_web::{post, web};
use anyhow::anyhow;
use tracing::info;

use crate::auth::{hash_password, sign_token, verify_password};
use crate::errors::ApiError;
use crate::models::{Company, User};
use crate::types::{AuthResponse, LoginRequest, SignupRequest, UserInfo};
use crate::AppState;

#[utoipa::path(
    post,
    context_path = "/api/auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Email already exists"),
    ),
    tag = "auth"
)]
#[post("/signup")]
pub async fn signup(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<SignupRequest>,
) -> Result<web::Json<AuthResponse>, ApiError> {
    if User::get_by_email(&app_state.pool, &request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(anyhow!("password hashing failed: {e}")))?;

    // User and company rows land together or not at all.
    let mut tx = app_state.pool.begin().await?;
    let user = User::create(&mut *tx, &request.email, &password_hash).await?;
    Company::create(&mut *tx, user.id, &request.company_name).await?;
    tx.commit().await?;

    let token = sign_token(&app_state.jwt_keys, user.id, &user.email)
        .map_err(|e| ApiError::Internal(anyhow!("token signing failed: {e}")))?;

    info!("account created: {}", user.id);
    Ok(web::Json(AuthResponse {
        token,
        user: UserInfo::from(&user),
    }))
}

#[utoipa::path(
    post,
    context_path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
#[post("/login")]
pub async fn login(
    app_state: web::Data<Arc<AppState>>,
    web::Json(request): web::Json<LoginRequest>,
) -> Result<web::Json<AuthResponse>, ApiError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let user = User::get_by_email(&app_state.pool, &request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = sign_token(&app_state.jwt_keys, user.id, &user.email)
        .map_err(|e| ApiError::Internal(anyhow!("token signing failed: {e}")))?;

    Ok(web::Json(AuthResponse {
        token,
        user: UserInfo::from(&user),
    }))
}
