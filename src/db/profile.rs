//! Profile model and repository.
//!
//! A profile is one-to-one with a user and is created lazily. It also
//! carries the presence columns (`is_online`, `last_seen`).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{QueryBuilder, SqliteConnection};

use super::DbPool;
use crate::{Result, ServiceError};

const PROFILE_COLUMNS: &str =
    "id, user_id, bio, avatar, birthday, status_message, is_online, last_seen";

/// Per-user profile record.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Profile {
    /// Profile ID.
    pub id: i64,
    /// Owning user (unique).
    pub user_id: i64,
    /// Free-text self-introduction.
    pub bio: Option<String>,
    /// Avatar reference (URL or storage key).
    pub avatar: Option<String>,
    /// Birthday.
    pub birthday: Option<NaiveDate>,
    /// Short status line.
    pub status_message: Option<String>,
    /// Online flag as last written by a presence touch.
    pub is_online: bool,
    /// Time of the last authenticated request.
    pub last_seen: Option<DateTime<Utc>>,
}

/// Partial update of the editable profile fields.
///
/// The outer `Option` says whether a field is being changed; the inner
/// one allows clearing it.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New bio.
    pub bio: Option<Option<String>>,
    /// New avatar reference.
    pub avatar: Option<Option<String>>,
    /// New birthday.
    pub birthday: Option<Option<NaiveDate>>,
    /// New status message.
    pub status_message: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
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

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.bio.is_none()
            && self.avatar.is_none()
            && self.birthday.is_none()
            && self.status_message.is_none()
    }
}

async fn fetch_profile(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?");
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(profile)
}

/// Repository for profile operations.
pub struct ProfileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get the profile of a user, if provisioned.
    pub async fn get_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(profile)
    }

    /// Get the profile of a user, creating an empty one if absent.
    ///
    /// The insert is a no-op when the row already exists, so concurrent
    /// callers end up reading the same profile.
    pub async fn get_or_create(&self, user_id: i64) -> Result<Profile> {
        let mut conn = self.pool.acquire().await?;
        Self::get_or_create_in(&mut conn, user_id).await
    }

    /// Same as [`get_or_create`](Self::get_or_create), on a caller-held
    /// connection or transaction.
    pub async fn get_or_create_in(conn: &mut SqliteConnection, user_id: i64) -> Result<Profile> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES (?) ON CONFLICT(user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        fetch_profile(conn, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("profile".to_string()))
    }

    /// Apply a partial update to a user's profile.
    ///
    /// Returns None if the user has no profile.
    pub async fn update(&self, user_id: i64, update: &ProfileUpdate) -> Result<Option<Profile>> {
        let mut conn = self.pool.acquire().await?;
        Self::update_in(&mut conn, user_id, update).await
    }

    /// Same as [`update`](Self::update), on a caller-held connection or
    /// transaction.
    pub async fn update_in(
        conn: &mut SqliteConnection,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>> {
        if update.is_empty() {
            return fetch_profile(conn, user_id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE profiles SET ");
        let mut separated = query.separated(", ");

        if let Some(ref bio) = update.bio {
            separated.push("bio = ");
            separated.push_bind_unseparated(bio.clone());
        }
        if let Some(ref avatar) = update.avatar {
            separated.push("avatar = ");
            separated.push_bind_unseparated(avatar.clone());
        }
        if let Some(birthday) = update.birthday {
            separated.push("birthday = ");
            separated.push_bind_unseparated(birthday);
        }
        if let Some(ref status_message) = update.status_message {
            separated.push("status_message = ");
            separated.push_bind_unseparated(status_message.clone());
        }

        query.push(" WHERE user_id = ");
        query.push_bind(user_id);

        let result = query.build().execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        fetch_profile(conn, user_id).await
    }

    /// Record activity: `last_seen = seen_at`, `is_online = true`.
    ///
    /// Returns false if the user has no profile; nothing is created.
    pub async fn touch(&self, user_id: i64, seen_at: DateTime<Utc>) -> Result<bool> {
        let result =
            sqlx::query("UPDATE profiles SET last_seen = ?, is_online = 1 WHERE user_id = ?")
                .bind(seen_at)
                .bind(user_id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
