use std::fmt;

use parkapi_security::Role;
use serde::{Deserialize, Serialize};

use crate::domain::model::User;

/// REST DTO for registering a user
#[derive(Clone, Deserialize)]
pub struct CreateUserReq {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CreateUserReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserReq")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// REST DTO for changing a password
#[derive(Clone, Deserialize)]
pub struct UpdatePasswordReq {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// REST DTO for user representation. `role` is the bare name (`CLIENT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn user_dto_emits_unprefixed_role() {
        let dto = UserDto::from(User {
            id: 1,
            username: "tody@email.com".to_owned(),
            role: Role::Client,
        });
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["role"], "CLIENT");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn create_request_debug_hides_password() {
        let req = CreateUserReq {
            username: "tody@email.com".to_owned(),
            password: "123456".to_owned(),
        };
        assert!(!format!("{req:?}").contains("123456"));
    }
}
