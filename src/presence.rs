//! Presence tracking.
//!
//! `last_seen` is written on authenticated activity; `is_online` is derived
//! from it at read time and never written back by a read.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::db::{DbPool, Profile, ProfileRepository};
use crate::Result;

/// Default online window in seconds (5 minutes).
pub const DEFAULT_ONLINE_WINDOW_SECS: u64 = 300;

/// Online/offline policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresencePolicy {
    online_window: Duration,
}

impl PresencePolicy {
    /// Create a policy with the given window in seconds.
    pub fn new(online_window_secs: u64) -> Self {
        // chrono durations are millisecond-bounded
        let secs = i64::try_from(online_window_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        Self {
            online_window: Duration::seconds(secs),
        }
    }

    /// The online window.
    pub fn online_window(&self) -> Duration {
        self.online_window
    }

    /// Whether a user last seen at `last_seen` counts as online at `now`.
    ///
    /// A timestamp in the future counts as online.
    pub fn is_online_at(&self, last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_seen {
            Some(seen) => now.signed_duration_since(seen) <= self.online_window,
            None => false,
        }
    }

    /// Return the profile with `is_online` derived from `last_seen` at `now`.
    pub fn recompute_at(&self, mut profile: Profile, now: DateTime<Utc>) -> Profile {
        profile.is_online = self.is_online_at(profile.last_seen, now);
        profile
    }
}

impl Default for PresencePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ONLINE_WINDOW_SECS)
    }
}

/// Records activity on profiles and reports presence.
pub struct PresenceTracker<'a> {
    pool: &'a DbPool,
    policy: PresencePolicy,
}

impl<'a> PresenceTracker<'a> {
    /// Create a tracker over the pool with the given policy.
    pub fn new(pool: &'a DbPool, policy: PresencePolicy) -> Self {
        Self { pool, policy }
    }

    /// Mark the user as seen now.
    ///
    /// Returns false without creating anything when the user has no profile.
    pub async fn touch(&self, user_id: i64) -> Result<bool> {
        let touched = ProfileRepository::new(self.pool)
            .touch(user_id, Utc::now())
            .await?;
        if !touched {
            debug!(user_id, "presence touch skipped: no profile");
        }
        Ok(touched)
    }

    /// The profile with a freshly computed `is_online`. Does not write.
    pub fn status(&self, profile: Profile) -> Profile {
        self.policy.recompute_at(profile, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    fn profile_seen(last_seen: Option<DateTime<Utc>>) -> Profile {
        Profile {
            id: 1,
            user_id: 1,
            bio: None,
            avatar: None,
            birthday: None,
            status_message: None,
            is_online: true,
            last_seen,
        }
    }

    #[test]
    fn test_seen_four_minutes_ago_is_online() {
        let policy = PresencePolicy::default();
        let now = Utc::now();
        assert!(policy.is_online_at(Some(now - Duration::minutes(4)), now));
    }

    #[test]
    fn test_seen_six_minutes_ago_is_offline() {
        let policy = PresencePolicy::default();
        let now = Utc::now();
        assert!(!policy.is_online_at(Some(now - Duration::minutes(6)), now));
    }

    #[test]
    fn test_never_seen_is_offline() {
        let policy = PresencePolicy::default();
        assert!(!policy.is_online_at(None, Utc::now()));
    }

    #[test]
    fn test_window_boundary_and_future() {
        let policy = PresencePolicy::new(60);
        let now = Utc::now();

        assert!(policy.is_online_at(Some(now - Duration::seconds(60)), now));
        assert!(!policy.is_online_at(Some(now - Duration::seconds(61)), now));
        assert!(policy.is_online_at(Some(now + Duration::seconds(30)), now));
        assert_eq!(policy.online_window(), Duration::seconds(60));
    }

    #[test]
    fn test_recompute_overrides_stored_flag() {
        let policy = PresencePolicy::default();
        let now = Utc::now();

        let stale = policy.recompute_at(profile_seen(Some(now - Duration::minutes(6))), now);
        assert!(!stale.is_online);

        let never = policy.recompute_at(profile_seen(None), now);
        assert!(!never.is_online);

        let mut offline = profile_seen(Some(now));
        offline.is_online = false;
        assert!(policy.recompute_at(offline, now).is_online);
    }

    #[tokio::test]
    async fn test_touch_skips_missing_profile() {
        let db = Database::open_in_memory().await.unwrap();
        UserRepository::new(db.pool())
            .create(&NewUser::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        let tracker = PresenceTracker::new(db.pool(), PresencePolicy::default());

        assert!(!tracker.touch(1).await.unwrap());
        assert!(ProfileRepository::new(db.pool())
            .get_by_user(1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_touch_then_status() {
        let db = Database::open_in_memory().await.unwrap();
        UserRepository::new(db.pool())
            .create(&NewUser::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        let profiles = ProfileRepository::new(db.pool());
        profiles.get_or_create(1).await.unwrap();
        let tracker = PresenceTracker::new(db.pool(), PresencePolicy::default());

        assert!(tracker.touch(1).await.unwrap());

        let profile = profiles.get_by_user(1).await.unwrap().unwrap();
        assert!(profile.last_seen.is_some());
        assert!(tracker.status(profile).is_online);
    }

    #[tokio::test]
    async fn test_status_does_not_write() {
        let db = Database::open_in_memory().await.unwrap();
        UserRepository::new(db.pool())
            .create(&NewUser::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        let profiles = ProfileRepository::new(db.pool());
        profiles.get_or_create(1).await.unwrap();
        profiles
            .touch(1, Utc::now() - Duration::minutes(6))
            .await
            .unwrap();
        let tracker = PresenceTracker::new(db.pool(), PresencePolicy::default());

        let stored = profiles.get_by_user(1).await.unwrap().unwrap();
        let shown = tracker.status(stored.clone());

        assert!(!shown.is_online);
        let after = profiles.get_by_user(1).await.unwrap().unwrap();
        assert!(after.is_online);
        assert_eq!(after, stored);
    }
}
