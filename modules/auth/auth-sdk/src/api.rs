//! The user-lookup capability consumed by the auth core.

use async_trait::async_trait;
use parkapi_security::Role;

use crate::error::UserLookupError;
use crate::models::{Credential, NewCredential, UserId};

/// Lookup and storage of credentials.
///
/// The auth core depends only on this trait; persistence code implements it.
/// Calls may block on I/O and are awaited without timeouts or retries.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Role of the credential with this exact (case-sensitive) username.
    async fn find_role_by_username(&self, username: &str)
    -> Result<Option<Role>, UserLookupError>;

    async fn find_by_username(&self, username: &str)
    -> Result<Option<Credential>, UserLookupError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<Credential>, UserLookupError>;

    /// Store a new credential and assign its id.
    ///
    /// # Errors
    ///
    /// - `DuplicateUsername` if the username is already taken
    async fn create(&self, credential: NewCredential) -> Result<Credential, UserLookupError>;

    /// Overwrite an existing credential.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no credential has `credential.id`
    /// - `DuplicateUsername` if the new username belongs to another credential
    async fn save(&self, credential: Credential) -> Result<Credential, UserLookupError>;

    /// All credentials ordered by id.
    async fn list(&self) -> Result<Vec<Credential>, UserLookupError>;
}
