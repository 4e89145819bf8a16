//! Credential verification.

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::verify_password;
use crate::db::{DbPool, User, UserRepository};
use crate::ServiceError;

/// Login errors.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Unknown user, wrong password or inactive account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<ServiceError> for LoginError {
    fn from(e: ServiceError) -> Self {
        LoginError::Database(e.to_string())
    }
}

/// Check a username/password pair and return the user.
///
/// The username lookup is case-insensitive. Every failure looks the same
/// to the caller. `last_login` is updated on success.
pub async fn authenticate(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> Result<User, LoginError> {
    let repo = UserRepository::new(pool);

    let user = match repo.get_by_username(username).await? {
        Some(user) => user,
        None => {
            info!(username, "Login failed: unknown user");
            return Err(LoginError::InvalidCredentials);
        }
    };

    if verify_password(password, &user.password).is_err() {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(LoginError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = user.id, "Login failed: inactive account");
        return Err(LoginError::InvalidCredentials);
    }

    repo.update_last_login(user.id).await?;

    info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(user)
}
