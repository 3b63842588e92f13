//! Error types for the user-lookup capability.

use thiserror::Error;

use crate::models::UserId;

/// Errors that can occur when reading or writing credentials.
#[derive(Debug, Error)]
pub enum UserLookupError {
    /// The username is already taken by another credential.
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    /// The credential to update does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The backing store failed.
    #[error("internal error: {0}")]
    Internal(String),
}
