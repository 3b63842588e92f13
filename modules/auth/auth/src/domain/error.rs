//! Domain errors for the auth core.

use auth_sdk::UserLookupError;

use super::token::TokenError;

#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    /// Unknown username or wrong password. The two are deliberately not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found: {key}")]
    UserNotFound { key: String },

    #[error("new password and confirmation do not match")]
    PasswordMismatch,

    #[error("current password is incorrect")]
    WrongCurrentPassword,

    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(key: impl ToString) -> Self {
        Self::UserNotFound {
            key: key.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<UserLookupError> for DomainError {
    fn from(e: UserLookupError) -> Self {
        match e {
            UserLookupError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            UserLookupError::NotFound(id) => Self::user_not_found(id),
            UserLookupError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<bcrypt::BcryptError> for DomainError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {e}"))
    }
}

impl From<tokio::task::JoinError> for DomainError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {e}"))
    }
}
