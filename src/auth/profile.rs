//! Profile management.
//!
//! Reads and edits the profile record together with the editable user
//! fields, and deletes accounts. Presence on read comes from the
//! `PresenceTracker`.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::auth::validation::{
    validate_avatar, validate_bio, validate_email, validate_name, validate_status_message,
    ValidationError,
};
use crate::db::{DbPool, Profile, ProfileRepository, ProfileUpdate, User, UserRepository, UserUpdate};
use crate::presence::{PresencePolicy, PresenceTracker};
use crate::ServiceError;

/// Profile-related errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// The new email belongs to another account.
    #[error("email already registered")]
    EmailExists,

    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl From<ServiceError> for ProfileError {
    fn from(e: ServiceError) -> Self {
        ProfileError::Database(e.to_string())
    }
}

/// A user together with their profile.
#[derive(Debug, Clone)]
pub struct AccountProfile {
    /// The account.
    pub user: User,
    /// The profile, with `is_online` computed at read time.
    pub profile: Profile,
}

/// Changes to a profile and the editable user fields.
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New email address.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New bio (inner None clears it).
    pub bio: Option<Option<String>>,
    /// New avatar reference (inner None clears it).
    pub avatar: Option<Option<String>>,
    /// New birthday (inner None clears it).
    pub birthday: Option<Option<NaiveDate>>,
    /// New status message (inner None clears it).
    pub status_message: Option<Option<String>>,
}

impl ProfileChanges {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set new first name.
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set new last name.
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Set or clear the bio.
    pub fn bio(mut self, bio: Option<String>) -> Self {
        self.bio = Some(bio);
        self
    }

    /// Set or clear the avatar reference.
    pub fn avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// Set or clear the birthday.
    pub fn birthday(mut self, birthday: Option<NaiveDate>) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Set or clear the status message.
    pub fn status_message(mut self, status_message: Option<String>) -> Self {
        self.status_message = Some(status_message);
        self
    }

    /// Validate every field that is being set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref first_name) = self.first_name {
            validate_name("first_name", first_name)?;
        }
        if let Some(ref last_name) = self.last_name {
            validate_name("last_name", last_name)?;
        }
        if let Some(Some(ref bio)) = self.bio {
            validate_bio(bio)?;
        }
        if let Some(Some(ref avatar)) = self.avatar {
            validate_avatar(avatar)?;
        }
        if let Some(Some(ref status)) = self.status_message {
            validate_status_message(status)?;
        }
        Ok(())
    }

    fn user_update(&self) -> UserUpdate {
        UserUpdate {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            ..UserUpdate::default()
        }
    }

    fn profile_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
            birthday: self.birthday,
            status_message: self.status_message.clone(),
        }
    }
}

/// Service for profile operations on behalf of a user.
pub struct ProfileService<'a> {
    pool: &'a DbPool,
    policy: PresencePolicy,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService.
    pub fn new(pool: &'a DbPool, policy: PresencePolicy) -> Self {
        Self { pool, policy }
    }

    /// Read the user's profile, provisioning it on first access.
    ///
    /// `is_online` is derived from `last_seen`; nothing is written besides
    /// the lazy creation.
    pub async fn get(&self, user_id: i64) -> Result<AccountProfile, ProfileError> {
        let user = UserRepository::new(self.pool)
            .get_by_id(user_id)
            .await?
            .ok_or(ProfileError::UserNotFound)?;
        let profile = ProfileRepository::new(self.pool)
            .get_or_create(user_id)
            .await?;

        Ok(self.present(user, profile))
    }

    /// Apply changes to the user's profile and account fields.
    ///
    /// All fields are validated before anything is written, and the user
    /// and profile rows are written in one transaction.
    pub async fn update(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<AccountProfile, ProfileError> {
        changes.validate()?;

        // Dropping the transaction on an early return rolls both writes back
        let mut tx = self.pool.begin().await.map_err(ServiceError::from)?;

        let user = match UserRepository::update_in(&mut tx, user_id, &changes.user_update()).await
        {
            Ok(Some(user)) => user,
            Ok(None) => return Err(ProfileError::UserNotFound),
            Err(ServiceError::Conflict(_)) => return Err(ProfileError::EmailExists),
            Err(e) => return Err(e.into()),
        };

        ProfileRepository::get_or_create_in(&mut tx, user_id).await?;
        let profile = ProfileRepository::update_in(&mut tx, user_id, &changes.profile_update())
            .await?
            .ok_or(ProfileError::UserNotFound)?;

        tx.commit().await.map_err(ServiceError::from)?;

        info!(user_id, username = %user.username, "Profile updated");

        Ok(self.present(user, profile))
    }

    /// Delete the account. Profile, tokens and connections go with it.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), ProfileError> {
        if !UserRepository::new(self.pool).delete(user_id).await? {
            return Err(ProfileError::UserNotFound);
        }
        info!(user_id, "Account deleted");
        Ok(())
    }

    fn present(&self, user: User, profile: Profile) -> AccountProfile {
        let profile = PresenceTracker::new(self.pool, self.policy).status(profile);
        AccountProfile { user, profile }
    }
}
