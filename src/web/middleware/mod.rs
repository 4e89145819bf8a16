//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod presence;

pub use auth::{bearer_claims, bearer_token, jwt_auth, AuthUser, JwtClaims, JwtState};
pub use cors::create_cors_layer;
pub use presence::track_presence;
