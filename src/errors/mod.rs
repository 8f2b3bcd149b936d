//! # Error Handling
//!
//! Error types for the TravelBook client. Validation failures stay local,
//! API failures carry the server's message, and 401 responses surface as
//! [`TravelBookError::Unauthorized`] after the stored token is cleared.

pub mod types;

pub use types::{AuthErrorType, Result, TravelBookError};

/// Short alias used across the crate
pub type Error = TravelBookError;
