//! API handlers.

pub mod auth;
pub mod contact;
pub mod profile;

pub use auth::*;
pub use contact::*;
pub use profile::*;
