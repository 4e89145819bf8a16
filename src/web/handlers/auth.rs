//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{self, RegistrationRequest};
use crate::db::{NewRefreshToken, RefreshTokenRepository, User, UserRepository};
use crate::presence::PresencePolicy;
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (the pool inside is cheap to share).
    pub db: Database,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
    /// Online window used on profile reads.
    pub presence: PresencePolicy,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        jwt_secret: &str,
        access_expiry: u64,
        refresh_expiry: u64,
        presence: PresencePolicy,
    ) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_token_expiry: access_expiry,
            refresh_token_expiry: refresh_expiry,
            presence,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, username: &str) -> Result<String, ApiError> {
        let now = u64::try_from(chrono::Utc::now().timestamp())
            .map_err(|_| ApiError::internal("Failed to generate token"))?;
        let exp = now.checked_add(self.access_token_expiry).ok_or_else(|| {
            tracing::error!(
                expiry_secs = self.access_token_expiry,
                "Access token expiry out of range"
            );
            ApiError::internal("Failed to generate token")
        })?;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Generate a refresh token.
    pub fn generate_refresh_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Issue an access token and a stored refresh token for a user.
    ///
    /// Returns `(access_token, refresh_token)`.
    pub async fn issue_tokens(&self, user: &User) -> Result<(String, String), ApiError> {
        let access_token = self.generate_access_token(user.id, &user.username)?;
        let refresh_token = self.generate_refresh_token();

        let expires_at = i64::try_from(self.refresh_token_expiry)
            .ok()
            .and_then(chrono::Duration::try_days)
            .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                tracing::error!(
                    expiry_days = self.refresh_token_expiry,
                    "Refresh token expiry out of range"
                );
                ApiError::internal("Failed to create session")
            })?;
        let new_token = NewRefreshToken {
            user_id: user.id,
            token: refresh_token.clone(),
            expires_at,
        };
        RefreshTokenRepository::new(self.db.pool())
            .create(&new_token)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store refresh token: {}", e);
                ApiError::internal("Failed to create session")
            })?;

        Ok((access_token, refresh_token))
    }

    async fn login_response(&self, user: &User) -> Result<LoginResponse, ApiError> {
        let (access_token, refresh_token) = self.issue_tokens(user).await?;
        Ok(LoginResponse {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
            user: UserInfo::from(user),
        })
    }
}

/// POST /api/auth/register - Create an account and sign in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    let user = auth::register(state.db.pool(), RegistrationRequest::from(req)).await?;
    let response = state.login_response(&user).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// POST /api/auth/login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = auth::authenticate(state.db.pool(), &req.username, &req.password).await?;
    let response = state.login_response(&user).await?;

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/auth/refresh - Exchange a refresh token for a new pair.
///
/// The presented token is revoked; a token can be exchanged only once.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let tokens = RefreshTokenRepository::new(state.db.pool());
    let token = tokens
        .get_valid_token(&req.refresh_token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = UserRepository::new(state.db.pool())
        .get_by_id(token.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    // Lost a race with another exchange of the same token
    if !tokens.revoke(&req.refresh_token).await? {
        return Err(ApiError::unauthorized("Invalid or expired refresh token"));
    }

    let (access_token, refresh_token) = state.issue_tokens(&user).await?;

    Ok(Json(ApiResponse::new(RefreshResponse {
        access_token,
        refresh_token,
        expires_in: state.access_token_expiry,
    })))
}

/// POST /api/auth/logout - Revoke the caller's refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    if req.refresh_token.is_empty() {
        return Err(ApiError::bad_request("refresh_token is required"));
    }

    let revoked = RefreshTokenRepository::new(state.db.pool())
        .revoke_for_user(&req.refresh_token, claims.sub)
        .await?;
    if !revoked {
        return Err(ApiError::bad_request("Invalid refresh token"));
    }

    tracing::info!(user_id = claims.sub, "User logged out");
    Ok(StatusCode::RESET_CONTENT)
}
