//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened. The
//! schema_version table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Accounts
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL COLLATE NOCASE,
    email       TEXT NOT NULL COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2id PHC string
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);

CREATE UNIQUE INDEX idx_users_username_nocase ON users(username COLLATE NOCASE);
CREATE UNIQUE INDEX idx_users_email_nocase ON users(email COLLATE NOCASE);
"#,
    // v2: Refresh tokens for JWT authentication
    r#"
CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_user_id ON refresh_tokens(user_id);
"#,
    // v3: Profiles, one per user
    r#"
CREATE TABLE profiles (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    bio             TEXT,
    avatar          TEXT,
    birthday        TEXT,
    status_message  TEXT,
    is_online       INTEGER NOT NULL DEFAULT 0,
    last_seen       TEXT
);
"#,
    // v4: Directed, confirmable connections between users
    r#"
CREATE TABLE connections (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    from_user     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    to_user       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    is_confirmed  INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    CONSTRAINT unique_connection UNIQUE (from_user, to_user)
);

CREATE INDEX idx_connections_to_user ON connections(to_user);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_valid_sql() {
        assert!(!MIGRATIONS.is_empty());
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }

    #[test]
    fn test_profiles_are_one_per_user() {
        let profiles = MIGRATIONS[2];
        assert!(profiles.contains("CREATE TABLE profiles"));
        assert!(profiles.contains("user_id         INTEGER NOT NULL UNIQUE"));
        assert!(profiles.contains("last_seen"));
    }

    #[test]
    fn test_connections_unique_pair() {
        let connections = MIGRATIONS[3];
        assert!(connections.contains("CREATE TABLE connections"));
        assert!(connections.contains("UNIQUE (from_user, to_user)"));
        assert!(connections.contains("is_confirmed  INTEGER NOT NULL DEFAULT 0"));
    }
}
