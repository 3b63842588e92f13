//! Credential models shared by the auth core and user persistence.

use parkapi_security::Role;

/// Server-assigned user identifier.
pub type UserId = i64;

/// A stored credential.
///
/// `password_hash` is always the output of the salted one-way hash; a
/// plaintext password never lives in this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// A credential that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
