//! Profile handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::AppState;
use crate::auth::{ProfileChanges, ProfileService};
use crate::web::dto::{ApiResponse, ProfileResponse, UpdateProfileRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// GET /api/profile - Own profile with current presence.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let account = ProfileService::new(state.db.pool(), state.presence)
        .get(claims.sub)
        .await?;

    Ok(Json(ApiResponse::new(account.into())))
}

/// PUT/PATCH /api/profile - Update own profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let account = ProfileService::new(state.db.pool(), state.presence)
        .update(claims.sub, ProfileChanges::from(req))
        .await?;

    Ok(Json(ApiResponse::new(account.into())))
}

/// DELETE /api/users/me - Delete own account.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<StatusCode, ApiError> {
    ProfileService::new(state.db.pool(), state.presence)
        .delete_account(claims.sub)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
