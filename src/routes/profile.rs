use std::sync::Arc;

use actix_web::{get, web};

use crate::errors::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Company, User};
use crate::types::{ProfileResponse, UserInfo};
use crate::AppState;

#[utoipa::path(
    get,
    context_path = "/api",
    responses(
        (status = 200, description = "The caller's account and company", body = ProfileResponse),
        (status = 404, description = "Account no longer exists"),
    ),
    security(("bearer_token" = [])),
    tag = "account"
)]
#[get("/profile")]
pub async fn get_profile(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
) -> Result<web::Json<ProfileResponse>, ApiError> {
    let user = User::get_by_id(&app_state.pool, authenticated_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let company = Company::get_by_user_id(&app_state.pool, user.id).await?;

    Ok(web::Json(ProfileResponse {
        user: UserInfo::from(&user),
        company,
    }))
}
