//! User registration.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_registration, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{DbPool, NewUser, User, UserRepository};
use crate::ServiceError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// Email already registered.
    #[error("email already registered")]
    EmailExists,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<ServiceError> for RegistrationError {
    fn from(e: ServiceError) -> Self {
        RegistrationError::Database(e.to_string())
    }
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Plain-text password (8-128 characters).
    pub password: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Set first and last name.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}

/// Register a new user.
///
/// 1. Validates all input fields
/// 2. Rejects a taken username or email
/// 3. Hashes the password
/// 4. Creates the user
///
/// A concurrent registration that wins the insert is reported the same way
/// as a taken username or email.
pub async fn register(
    pool: &DbPool,
    request: RegistrationRequest,
) -> Result<User, RegistrationError> {
    validate_registration(
        &request.username,
        &request.password,
        &request.email,
        &request.first_name,
        &request.last_name,
    )?;

    let repo = UserRepository::new(pool);
    if repo.username_exists(&request.username).await? {
        return Err(RegistrationError::UsernameExists);
    }
    if repo.email_exists(&request.email).await? {
        return Err(RegistrationError::EmailExists);
    }

    let password_hash = hash_password(&request.password)?;

    let new_user = NewUser::new(&request.username, &request.email, password_hash)
        .with_name(&request.first_name, &request.last_name);

    let user = match repo.create(&new_user).await {
        Ok(user) => user,
        Err(ServiceError::Conflict(_)) => {
            return Err(if repo.username_exists(&request.username).await? {
                RegistrationError::UsernameExists
            } else {
                RegistrationError::EmailExists
            });
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}
