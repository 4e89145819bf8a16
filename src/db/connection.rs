//! Connection model and repository.
//!
//! A connection is a directed edge `from_user -> to_user` with a confirm
//! flag. `(from_user, to_user)` is unique; the flag only moves false -> true.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{map_insert_error, DbPool};
use crate::{Result, ServiceError};

const CONNECTION_COLUMNS: &str = "id, from_user, to_user, is_confirmed, created_at";

/// Directed, confirmable relationship between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Connection {
    /// Connection ID.
    pub id: i64,
    /// User who sent the request.
    pub from_user: i64,
    /// User the request is addressed to.
    pub to_user: i64,
    /// Whether `to_user` accepted the request.
    pub is_confirmed: bool,
    /// Creation time (immutable).
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Whether `user_id` is one of the two endpoints.
    pub fn involves(&self, user_id: i64) -> bool {
        self.from_user == user_id || self.to_user == user_id
    }

    /// The endpoint opposite to `user_id`.
    ///
    /// For a self-connection this is the user itself.
    pub fn other_party(&self, user_id: i64) -> i64 {
        if self.from_user == user_id {
            self.to_user
        } else {
            self.from_user
        }
    }
}

/// Repository for connection rows.
pub struct ConnectionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ConnectionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a pending connection.
    ///
    /// An existing row for the same ordered pair surfaces as
    /// `ServiceError::Conflict`.
    pub async fn create(&self, from_user: i64, to_user: i64) -> Result<Connection> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO connections (from_user, to_user, is_confirmed, created_at)
             VALUES (?, ?, 0, ?) RETURNING id",
        )
        .bind(from_user)
        .bind(to_user)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error("connection", e))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("connection".to_string()))
    }

    /// Get a connection by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Connection>> {
        let sql = format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?");
        let connection = sqlx::query_as::<_, Connection>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(connection)
    }

    /// Get the connection for an exact ordered pair.
    pub async fn get_by_pair(&self, from_user: i64, to_user: i64) -> Result<Option<Connection>> {
        let sql = format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections WHERE from_user = ? AND to_user = ?"
        );
        let connection = sqlx::query_as::<_, Connection>(&sql)
            .bind(from_user)
            .bind(to_user)
            .fetch_optional(self.pool)
            .await?;
        Ok(connection)
    }

    /// Confirm a pending connection addressed to `to_user`.
    ///
    /// The update is conditional on the row still being pending, so a
    /// replayed or concurrent confirm affects nothing. Returns false when
    /// no row matched.
    pub async fn confirm(&self, id: i64, to_user: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE connections SET is_confirmed = 1
             WHERE id = ? AND to_user = ? AND is_confirmed = 0",
        )
        .bind(id)
        .bind(to_user)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a connection. Returns true if a row was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM connections WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Confirmed connections where the user is either endpoint.
    pub async fn list_confirmed_for(&self, user_id: i64) -> Result<Vec<Connection>> {
        let sql = format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections
             WHERE is_confirmed = 1 AND (from_user = ? OR to_user = ?)
             ORDER BY created_at, id"
        );
        let connections = sqlx::query_as::<_, Connection>(&sql)
            .bind(user_id)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(connections)
    }

    /// Pending requests addressed to the user.
    pub async fn list_pending_incoming(&self, user_id: i64) -> Result<Vec<Connection>> {
        let sql = format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections
             WHERE is_confirmed = 0 AND to_user = ?
             ORDER BY created_at, id"
        );
        let connections = sqlx::query_as::<_, Connection>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(connections)
    }

    /// Pending requests sent by the user.
    pub async fn list_pending_outgoing(&self, user_id: i64) -> Result<Vec<Connection>> {
        let sql = format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections
             WHERE is_confirmed = 0 AND from_user = ?
             ORDER BY created_at, id"
        );
        let connections = sqlx::query_as::<_, Connection>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(connections)
    }

    /// Count all connection rows.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM connections")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        for name in ["alice", "bob", "carol"] {
            users
                .create(&NewUser::new(name, format!("{name}@example.com"), "hash"))
                .await
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_create_pending() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());

        let conn = repo.create(1, 2).await.unwrap();

        assert_eq!(conn.from_user, 1);
        assert_eq!(conn.to_user, 2);
        assert!(!conn.is_confirmed);
        assert_eq!(repo.get_by_pair(1, 2).await.unwrap(), Some(conn));
        assert!(repo.get_by_pair(2, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_conflict() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());

        repo.create(1, 2).await.unwrap();
        let result = repo.create(1, 2).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        // The reverse direction is a different pair
        assert!(repo.create(2, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_not_found() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());

        let result = repo.create(999, 2).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_confirm_only_once_and_only_by_recipient() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());
        let conn = repo.create(1, 2).await.unwrap();

        assert!(!repo.confirm(conn.id, 1).await.unwrap());
        assert!(repo.confirm(conn.id, 2).await.unwrap());
        assert!(!repo.confirm(conn.id, 2).await.unwrap());

        let stored = repo.get_by_id(conn.id).await.unwrap().unwrap();
        assert!(stored.is_confirmed);
        assert_eq!(stored.created_at, conn.created_at);
    }

    #[tokio::test]
    async fn test_list_confirmed_for_both_endpoints() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());

        let ab = repo.create(1, 2).await.unwrap();
        let ca = repo.create(3, 1).await.unwrap();
        repo.create(2, 3).await.unwrap();
        repo.confirm(ab.id, 2).await.unwrap();

        let alice: Vec<i64> = repo
            .list_confirmed_for(1)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(alice, vec![ab.id]);

        let bob: Vec<i64> = repo
            .list_confirmed_for(2)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(bob, vec![ab.id]);

        let incoming = repo.list_pending_incoming(1).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].id, ca.id);

        let outgoing = repo.list_pending_outgoing(2).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].to_user, 3);
    }

    #[tokio::test]
    async fn test_delete_and_cascade() {
        let db = setup_db().await;
        let repo = ConnectionRepository::new(db.pool());

        let ab = repo.create(1, 2).await.unwrap();
        repo.create(1, 3).await.unwrap();
        repo.create(2, 3).await.unwrap();

        assert!(repo.delete(ab.id).await.unwrap());
        assert!(!repo.delete(ab.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 2);

        // Deleting carol removes every edge touching her
        UserRepository::new(db.pool()).delete(3).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn test_involves_and_other_party() {
        let conn = Connection {
            id: 1,
            from_user: 10,
            to_user: 20,
            is_confirmed: true,
            created_at: Utc::now(),
        };

        assert!(conn.involves(10));
        assert!(conn.involves(20));
        assert!(!conn.involves(30));
        assert_eq!(conn.other_party(10), 20);
        assert_eq!(conn.other_party(20), 10);

        let own = Connection {
            to_user: 10,
            ..conn
        };
        assert_eq!(own.other_party(10), 10);
    }
}
