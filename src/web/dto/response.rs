//! Response DTOs for Web API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::auth::AccountProfile;
use crate::db::{Connection, User};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// Login and registration response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    /// User information.
    pub user: UserInfo,
}

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Token refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
    /// Expiry in seconds.
    pub expires_in: u64,
}

// ============================================================================
// Profile DTOs
// ============================================================================

/// Own profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Account fields.
    pub user: UserInfo,
    /// Free-text bio.
    pub bio: Option<String>,
    /// Avatar reference.
    pub avatar: Option<String>,
    /// Birthday.
    pub birthday: Option<NaiveDate>,
    /// Status message.
    pub status_message: Option<String>,
    /// Online now, derived from `last_seen`.
    pub is_online: bool,
    /// Time of the last authenticated request.
    pub last_seen: Option<DateTime<Utc>>,
}

impl From<AccountProfile> for ProfileResponse {
    fn from(account: AccountProfile) -> Self {
        let AccountProfile { user, profile } = account;
        Self {
            user: UserInfo::from(&user),
            bio: profile.bio,
            avatar: profile.avatar,
            birthday: profile.birthday,
            status_message: profile.status_message,
            is_online: profile.is_online,
            last_seen: profile.last_seen,
        }
    }
}

// ============================================================================
// Contact DTOs
// ============================================================================

/// Connection row as returned by the contact endpoints.
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    /// Connection ID.
    pub id: i64,
    /// Requesting user.
    pub from_user: i64,
    /// Addressee.
    pub to_user: i64,
    /// Whether the addressee accepted.
    pub is_confirmed: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Connection> for ConnectionResponse {
    fn from(c: Connection) -> Self {
        Self {
            id: c.id,
            from_user: c.from_user,
            to_user: c.to_user,
            is_confirmed: c.is_confirmed,
            created_at: c.created_at,
        }
    }
}

/// Pending requests response.
#[derive(Debug, Serialize)]
pub struct PendingRequestsResponse {
    /// Requests addressed to the caller.
    pub incoming: Vec<ConnectionResponse>,
    /// Requests sent by the caller.
    pub outgoing: Vec<ConnectionResponse>,
}
