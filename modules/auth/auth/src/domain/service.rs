use std::sync::Arc;

use auth_sdk::{Credential, UserId, UserLookup};
use tracing::instrument;

use super::error::DomainError;
use super::password::PasswordHasher;
use super::token::{JwtToken, TokenCodec};

/// Login, token issuance and password change.
///
/// Credentials are read and written only through [`UserLookup`]. bcrypt work
/// runs on the blocking pool so request workers never stall on it.
pub struct AuthService {
    users: Arc<dyn UserLookup>,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserLookup>, codec: Arc<TokenCodec>, hasher: PasswordHasher) -> Self {
        Self {
            users,
            codec,
            hasher,
        }
    }

    #[must_use]
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Verify `username`/`password` and issue a token for the user.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the user does not exist or the password is wrong
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<JwtToken, DomainError> {
        let Some(credential) = self.users.find_by_username(username).await? else {
            tracing::debug!("Login for unknown username");
            return Err(DomainError::InvalidCredentials);
        };

        if !self
            .password_matches(password, &credential.password_hash)
            .await?
        {
            tracing::debug!(user_id = credential.id, "Login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        self.issue_token_for(username).await
    }

    /// Issue a token carrying the user's current role.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no user has this username
    #[instrument(skip(self), fields(username = %username))]
    pub async fn issue_token_for(&self, username: &str) -> Result<JwtToken, DomainError> {
        let role = self
            .users
            .find_role_by_username(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))?;

        let token = self.codec.issue(username, role)?;
        tracing::info!(%role, "Issued token");
        Ok(token)
    }

    /// Replace the password of user `id`.
    ///
    /// The confirmation check runs before the user is loaded; nothing is
    /// stored unless every check passes.
    ///
    /// # Errors
    ///
    /// - `PasswordMismatch` if `new_password != confirm_password`
    /// - `UserNotFound` if `id` does not exist
    /// - `WrongCurrentPassword` if `current_password` does not match the stored hash
    #[instrument(skip_all, fields(user_id = id))]
    pub async fn change_password(
        &self,
        id: UserId,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Credential, DomainError> {
        if new_password != confirm_password {
            return Err(DomainError::PasswordMismatch);
        }

        let mut credential = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if !self
            .password_matches(current_password, &credential.password_hash)
            .await?
        {
            return Err(DomainError::WrongCurrentPassword);
        }

        credential.password_hash = self.hash_password(new_password).await?;
        let saved = self.users.save(credential).await?;
        tracing::info!("Password changed");
        Ok(saved)
    }

    /// # Errors
    ///
    /// `Internal` if bcrypt fails or the blocking task is lost.
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, DomainError> {
        let hasher = self.hasher;
        let plaintext = plaintext.to_owned();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await??;
        Ok(hash)
    }

    /// # Errors
    ///
    /// `Internal` if the blocking task is lost.
    pub async fn password_matches(
        &self,
        plaintext: &str,
        stored_hash: &str,
    ) -> Result<bool, DomainError> {
        let hasher = self.hasher;
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();
        let matched =
            tokio::task::spawn_blocking(move || hasher.matches(&plaintext, &stored_hash)).await?;
        Ok(matched)
    }
}
