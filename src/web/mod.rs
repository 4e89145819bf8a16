//! Web API module.
//!
//! JSON over HTTP for accounts, profiles and contacts, authenticated with
//! short-lived JWT access tokens and stored refresh tokens.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
