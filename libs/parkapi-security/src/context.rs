use crate::role::Role;

/// Identity established for one request after a bearer token validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    role: Role,
}

impl Principal {
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Authorities derived from the role (`ROLE_<name>`).
    #[must_use]
    pub fn authorities(&self) -> Vec<&'static str> {
        vec![self.role.authority()]
    }
}

/// `SecurityContext` carries the security-related information of a single request.
///
/// Inserted into request extensions by the authorization filter for every request,
/// either anonymous or holding the authenticated [`Principal`]. It lives only for
/// the duration of that request and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no principal
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Username of the authenticated principal, `None` when anonymous.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.principal.as_ref().map(Principal::username)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.principal.as_ref().map(Principal::role)
    }

    /// True when authenticated with exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    username: Option<String>,
    role: Option<Role>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_owned());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Build the context. Both username and role are needed for an
    /// authenticated context; anything less builds an anonymous one.
    #[must_use]
    pub fn build(self) -> SecurityContext {
        match (self.username, self.role) {
            (Some(username), Some(role)) => {
                SecurityContext::authenticated(Principal::new(username, role))
            }
            _ => SecurityContext::anonymous(),
        }
    }
}
