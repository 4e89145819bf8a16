//! Contact handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::contact::ContactService;
use crate::web::dto::{
    ApiResponse, ConnectionResponse, PendingRequestsResponse, SendContactRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/contacts - Send a contact request.
pub async fn send_contact_request(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<SendContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConnectionResponse>>), ApiError> {
    let connection = ContactService::new(state.db.pool())
        .send_request(claims.sub, req.to_user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(connection.into())),
    ))
}

/// GET /api/contacts - Confirmed contacts of the caller.
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<ConnectionResponse>>>, ApiError> {
    let contacts = ContactService::new(state.db.pool())
        .list_contacts(claims.sub)
        .await?;

    Ok(Json(ApiResponse::new(
        contacts.into_iter().map(ConnectionResponse::from).collect(),
    )))
}

/// GET /api/contacts/requests - Pending requests to and from the caller.
pub async fn list_contact_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<PendingRequestsResponse>>, ApiError> {
    let pending = ContactService::new(state.db.pool())
        .list_pending(claims.sub)
        .await?;

    Ok(Json(ApiResponse::new(PendingRequestsResponse {
        incoming: pending.incoming.into_iter().map(Into::into).collect(),
        outgoing: pending.outgoing.into_iter().map(Into::into).collect(),
    })))
}

/// POST /api/contacts/:id/confirm - Confirm a request addressed to the caller.
pub async fn confirm_contact_request(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ConnectionResponse>>, ApiError> {
    let connection = ContactService::new(state.db.pool())
        .confirm_request(id, claims.sub)
        .await?;

    Ok(Json(ApiResponse::new(connection.into())))
}

/// DELETE /api/contacts/:id - Reject, withdraw or end a contact.
pub async fn remove_contact(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ContactService::new(state.db.pool())
        .remove(id, claims.sub)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
