//! Contact requests between users.
//!
//! This module provides the lifecycle of a contact relationship:
//! - Sending a request (pending)
//! - Confirmation by the addressee
//! - Removal by either party, in any state
//! - Listing confirmed contacts and pending requests

mod service;

pub use service::{ContactError, ContactService, PendingRequests};
