use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::token::JwtToken;

/// REST DTO for `POST /api/v1/auth`
#[derive(Clone, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginReq")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// REST DTO for an issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub token: String,
}

impl From<JwtToken> for TokenDto {
    fn from(token: JwtToken) -> Self {
        Self {
            token: token.into_string(),
        }
    }
}
