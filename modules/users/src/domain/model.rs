use auth_sdk::{Credential, UserId};
use parkapi_security::Role;

/// A registered user as exposed outside the auth core. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl From<Credential> for User {
    fn from(c: Credential) -> Self {
        Self {
            id: c.id,
            username: c.username,
            role: c.role,
        }
    }
}
