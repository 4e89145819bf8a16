//! Account module.
//!
//! This module provides password hashing, input validation, registration,
//! credential verification and profile management.

mod login;
mod password;
mod profile;
mod registration;
pub mod validation;

pub use login::{authenticate, LoginError};
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use profile::{AccountProfile, ProfileChanges, ProfileError, ProfileService};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use validation::ValidationError;
