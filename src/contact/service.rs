//! Contact service.
//!
//! Enforces the request state machine on top of the connection repository.
//! Every operation takes the acting user explicitly.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::db::{Connection, ConnectionRepository, DbPool, UserRepository};
use crate::ServiceError;

/// Contact lifecycle errors.
#[derive(Error, Debug)]
pub enum ContactError {
    /// The addressee does not exist.
    #[error("user not found")]
    UserNotFound,

    /// The acting user's account no longer exists.
    #[error("account not found")]
    AccountNotFound,

    /// A request for the same ordered pair already exists.
    #[error("contact request already exists")]
    DuplicateRequest,

    /// No pending request with this ID is addressed to the acting user.
    #[error("contact request not found")]
    RequestNotFound,

    /// No connection with this ID.
    #[error("connection not found")]
    ConnectionNotFound,

    /// The acting user is not a party to the connection.
    #[error("not a party to this connection")]
    Forbidden,

    /// Storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] ServiceError),
}

/// Pending requests seen from one user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PendingRequests {
    /// Requests addressed to the user.
    pub incoming: Vec<Connection>,
    /// Requests sent by the user.
    pub outgoing: Vec<Connection>,
}

/// Service for contact operations.
pub struct ContactService<'a> {
    pool: &'a DbPool,
}

impl<'a> ContactService<'a> {
    /// Create a new ContactService with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Send a contact request from `from_user` to `to_user`.
    ///
    /// The reverse pair is a separate request and is allowed. A request to
    /// oneself is accepted as well.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if `from_user` was deleted
    /// - `UserNotFound` if `to_user` does not exist, or is deleted while
    ///   the request is being stored
    /// - `DuplicateRequest` if the ordered pair already has a row, including
    ///   when a concurrent request wins the insert
    pub async fn send_request(
        &self,
        from_user: i64,
        to_user: i64,
    ) -> Result<Connection, ContactError> {
        let users = UserRepository::new(self.pool);
        if users.get_by_id(from_user).await?.is_none() {
            return Err(ContactError::AccountNotFound);
        }
        if users.get_by_id(to_user).await?.is_none() {
            return Err(ContactError::UserNotFound);
        }

        let repo = ConnectionRepository::new(self.pool);
        if repo.get_by_pair(from_user, to_user).await?.is_some() {
            return Err(ContactError::DuplicateRequest);
        }

        let connection = match repo.create(from_user, to_user).await {
            Ok(connection) => connection,
            Err(ServiceError::Conflict(_)) => return Err(ContactError::DuplicateRequest),
            Err(ServiceError::NotFound(_)) => return Err(ContactError::UserNotFound),
            Err(e) => return Err(e.into()),
        };

        info!(
            connection_id = connection.id,
            from_user, to_user, "contact request sent"
        );
        Ok(connection)
    }

    /// Confirm a pending request addressed to `acting_user`.
    ///
    /// # Errors
    ///
    /// `RequestNotFound` if the row is missing, addressed to someone else,
    /// or already confirmed.
    pub async fn confirm_request(
        &self,
        connection_id: i64,
        acting_user: i64,
    ) -> Result<Connection, ContactError> {
        let repo = ConnectionRepository::new(self.pool);
        if !repo.confirm(connection_id, acting_user).await? {
            return Err(ContactError::RequestNotFound);
        }

        let connection = repo
            .get_by_id(connection_id)
            .await?
            .ok_or(ContactError::RequestNotFound)?;

        info!(connection_id, acting_user, "contact request confirmed");
        Ok(connection)
    }

    /// Remove a connection in any state.
    ///
    /// Rejects or withdraws a pending request, or ends a confirmed contact.
    ///
    /// # Errors
    ///
    /// - `ConnectionNotFound` if the row is missing
    /// - `Forbidden` if `acting_user` is neither endpoint
    pub async fn remove(&self, connection_id: i64, acting_user: i64) -> Result<(), ContactError> {
        let repo = ConnectionRepository::new(self.pool);
        let connection = repo
            .get_by_id(connection_id)
            .await?
            .ok_or(ContactError::ConnectionNotFound)?;

        if !connection.involves(acting_user) {
            return Err(ContactError::Forbidden);
        }

        if !repo.delete(connection_id).await? {
            // Removed concurrently by the other party
            return Err(ContactError::ConnectionNotFound);
        }

        info!(
            connection_id,
            acting_user,
            was_confirmed = connection.is_confirmed,
            "connection removed"
        );
        Ok(())
    }

    /// Confirmed connections where `user_id` is either endpoint.
    pub async fn list_contacts(&self, user_id: i64) -> Result<Vec<Connection>, ContactError> {
        let contacts = ConnectionRepository::new(self.pool)
            .list_confirmed_for(user_id)
            .await?;
        Ok(contacts)
    }

    /// Pending requests addressed to and sent by `user_id`.
    pub async fn list_pending(&self, user_id: i64) -> Result<PendingRequests, ContactError> {
        let repo = ConnectionRepository::new(self.pool);
        Ok(PendingRequests {
            incoming: repo.list_pending_incoming(user_id).await?,
            outgoing: repo.list_pending_outgoing(user_id).await?,
        })
    }
}
