//! Presence middleware.
//!
//! Marks the caller as seen once the handler has produced its response.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

use super::auth::{bearer_claims, JwtState};
use crate::presence::PresenceTracker;
use crate::web::handlers::AppState;

/// Touch the profile of the user behind a valid bearer token.
///
/// Requests without a valid token pass through untouched. A storage
/// failure is logged and never changes the response.
pub async fn track_presence(state: Arc<AppState>, request: Request<Body>, next: Next) -> Response {
    let claims = request
        .extensions()
        .get::<Arc<JwtState>>()
        .and_then(|jwt_state| bearer_claims(request.headers(), jwt_state));

    let response = next.run(request).await;

    if let Some(claims) = claims {
        let tracker = PresenceTracker::new(state.db.pool(), state.presence);
        if let Err(e) = tracker.touch(claims.sub).await {
            tracing::warn!(user_id = claims.sub, "Failed to record presence: {}", e);
        }
    }

    response
}
