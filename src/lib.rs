//! Account service.
//!
//! User accounts with token authentication, profiles with presence, and
//! contact requests between users.

pub mod auth;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod logging;
pub mod presence;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, validate_password, verify_password, AccountProfile,
    LoginError, PasswordError, ProfileChanges, ProfileError, ProfileService, RegistrationError,
    RegistrationRequest, ValidationError,
};
pub use config::Config;
pub use contact::{ContactError, ContactService, PendingRequests};
pub use db::{Connection, Database, NewUser, Profile, User, UserRepository, UserUpdate};
pub use error::{Result, ServiceError};
pub use presence::{PresencePolicy, PresenceTracker};
pub use web::WebServer;
