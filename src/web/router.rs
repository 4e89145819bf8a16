//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    confirm_contact_request, delete_account, get_profile, list_contact_requests, list_contacts,
    login, logout, refresh, register, remove_contact, send_contact_request, update_profile,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, track_presence, JwtState};

/// Create the main API router.
///
/// Layers, outermost first: tracing, CORS, JWT state injection, presence.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout));

    let contact_routes = Router::new()
        .route("/", get(list_contacts).post(send_contact_request))
        .route("/requests", get(list_contact_requests))
        .route("/:id/confirm", post(confirm_contact_request))
        .route("/:id", delete(remove_contact));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route(
            "/profile",
            get(get_profile).put(update_profile).patch(update_profile),
        )
        .route("/users/me", delete(delete_account))
        .nest("/contacts", contact_routes);

    let jwt_state_for_middleware = jwt_state.clone();
    let presence_state = app_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                }))
                .layer(middleware::from_fn(move |req, next| {
                    let state = presence_state.clone();
                    track_presence(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
