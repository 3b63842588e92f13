use std::sync::{Arc, LazyLock};

use auth::AuthService;
use auth_sdk::{NewCredential, UserId, UserLookup};
use parkapi_security::{Role, SecurityContext};
use regex::Regex;
use tracing::instrument;

use super::error::DomainError;
use super::model::User;

/// Accepted username shape: a lowercase e-mail address.
pub const USERNAME_PATTERN: &str = r"^[a-z0-9.+-]+@[a-z0-9.-]+\.[a-z]{2,}$";

/// Passwords are exactly this many characters.
pub const PASSWORD_LEN: usize = 6;

static USERNAME_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN));

pub struct UsersService {
    users: Arc<dyn UserLookup>,
    auth: Arc<AuthService>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserLookup>, auth: Arc<AuthService>) -> Self {
        Self { users, auth }
    }

    /// Register a new `CLIENT` user.
    ///
    /// # Errors
    ///
    /// - `Validation` if the username is not an e-mail address or the password
    ///   is not exactly [`PASSWORD_LEN`] characters
    /// - `DuplicateUsername` if the username is taken
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_registration(username, password)?;
        self.insert(username, password, Role::Client).await
    }

    /// Seed an `ADMIN` user unless the username already exists.
    ///
    /// Returns the existing user untouched when it does.
    ///
    /// # Errors
    ///
    /// Same validation as [`create_user`](Self::create_user).
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<User, DomainError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            tracing::info!(role = %existing.role, "Bootstrap user already present");
            return Ok(existing.into());
        }
        validate_registration(username, password)?;
        self.insert(username, password, Role::Admin).await
    }

    async fn insert(&self, username: &str, password: &str, role: Role) -> Result<User, DomainError> {
        let password_hash = self.auth.hash_password(password).await?;
        let created = self
            .users
            .create(NewCredential {
                username: username.to_owned(),
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = created.id, %role, "User created");
        Ok(created.into())
    }

    /// Fetch a user. `ADMIN` sees everyone, other roles only themselves.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the caller is neither admin nor the owner
    /// - `UserNotFound` if the id does not exist
    #[instrument(skip(self, ctx), fields(user_id = id))]
    pub async fn get_user(&self, ctx: &SecurityContext, id: UserId) -> Result<User, DomainError> {
        if !ctx.has_role(Role::Admin) {
            self.ensure_owner(ctx, id).await?;
        }

        let credential = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(credential.into())
    }

    /// # Errors
    ///
    /// `Forbidden` unless the caller is `ADMIN`.
    #[instrument(skip(self, ctx))]
    pub async fn list_users(&self, ctx: &SecurityContext) -> Result<Vec<User>, DomainError> {
        if !ctx.has_role(Role::Admin) {
            return Err(DomainError::Forbidden);
        }
        let users = self.users.list().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Change the caller's own password.
    ///
    /// # Errors
    ///
    /// - `InvalidPassword` if any field is not exactly [`PASSWORD_LEN`] characters
    /// - `Forbidden` if `id` is not the caller's own id
    /// - `Auth(..)` for mismatch, wrong current password or a missing user
    #[instrument(skip_all, fields(user_id = id))]
    pub async fn change_password(
        &self,
        ctx: &SecurityContext,
        id: UserId,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), DomainError> {
        for (field, value) in [
            ("current_password", current_password),
            ("new_password", new_password),
            ("confirm_password", confirm_password),
        ] {
            if value.chars().count() != PASSWORD_LEN {
                return Err(DomainError::InvalidPassword(format!(
                    "{field} must be exactly {PASSWORD_LEN} characters"
                )));
            }
        }

        self.ensure_owner(ctx, id).await?;
        self.auth
            .change_password(id, current_password, new_password, confirm_password)
            .await?;
        Ok(())
    }

    /// Resolve the caller's own id and require it to equal `id`.
    async fn ensure_owner(&self, ctx: &SecurityContext, id: UserId) -> Result<(), DomainError> {
        let Some(username) = ctx.username() else {
            return Err(DomainError::Forbidden);
        };
        match self.users.find_by_username(username).await? {
            Some(caller) if caller.id == id => Ok(()),
            _ => {
                tracing::debug!(caller = username, "Caller is not the owner");
                Err(DomainError::Forbidden)
            }
        }
    }
}

fn validate_registration(username: &str, password: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::validation("username", "must not be blank"));
    }
    let username_re = USERNAME_RE
        .as_ref()
        .map_err(|e| DomainError::Internal(format!("username pattern does not compile: {e}")))?;
    if !username_re.is_match(username) {
        return Err(DomainError::validation("username", "invalid e-mail format"));
    }
    if password.chars().count() != PASSWORD_LEN {
        return Err(DomainError::validation(
            "password",
            format!("must be exactly {PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}
