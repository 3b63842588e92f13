use auth_sdk::{UserId, UserLookupError};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Registration input rejected.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Password-change input rejected.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("User not found: {id}")]
    UserNotFound { id: UserId },

    #[error("Access denied")]
    Forbidden,

    #[error(transparent)]
    Auth(#[from] auth::DomainError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn user_not_found(id: UserId) -> Self {
        Self::UserNotFound { id }
    }
}

impl From<UserLookupError> for DomainError {
    fn from(e: UserLookupError) -> Self {
        match e {
            UserLookupError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            UserLookupError::NotFound(id) => Self::UserNotFound { id },
            UserLookupError::Internal(msg) => Self::Internal(msg),
        }
    }
}
