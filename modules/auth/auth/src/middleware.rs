//! Request-time authorization.
//!
//! Two layers run in order on every request:
//!
//! 1. [`authorization_filter`] reads `Authorization: Bearer <token>`, validates
//!    it and always inserts a [`SecurityContext`] into the request extensions,
//!    authenticated or anonymous. It never rejects a request.
//! 2. [`route_guard`] resolves the route's [`AuthRequirement`] from the
//!    [`RoutePolicy`] and rejects anonymous callers (401) or callers lacking
//!    the required role (403).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, Method, header};
use parkapi_errors::Problem;
use parkapi_security::{Role, SecurityContext};

use crate::domain::token::{BEARER_PREFIX, TokenCodec};

/// What a route demands from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    Public,
    Authenticated,
    Role(Role),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid route pattern '{method} {path}': {source}")]
pub struct RoutePolicyError {
    method: Method,
    path: String,
    #[source]
    source: matchit::InsertError,
}

/// Per-method route patterns mapped to their requirement.
///
/// Patterns use `{param}` segments, the same syntax as the axum router.
#[derive(Clone)]
pub struct RoutePolicy {
    matchers: Arc<HashMap<Method, matchit::Router<AuthRequirement>>>,
    require_auth_by_default: bool,
}

impl RoutePolicy {
    #[must_use]
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder::default()
    }

    /// Requirement for (method, path). Unlisted routes fall back to the default.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> AuthRequirement {
        let listed = self
            .matchers
            .get(method)
            .and_then(|matcher| matcher.at(path).ok())
            .map(|m| *m.value);

        match listed {
            Some(requirement) => requirement,
            None if self.require_auth_by_default => AuthRequirement::Authenticated,
            None => AuthRequirement::Public,
        }
    }
}

pub struct RoutePolicyBuilder {
    routes: Vec<(Method, String, AuthRequirement)>,
    require_auth_by_default: bool,
}

impl Default for RoutePolicyBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            require_auth_by_default: true,
        }
    }
}

impl RoutePolicyBuilder {
    #[must_use]
    pub fn public(self, method: Method, path: &str) -> Self {
        self.route(method, path, AuthRequirement::Public)
    }

    #[must_use]
    pub fn authenticated(self, method: Method, path: &str) -> Self {
        self.route(method, path, AuthRequirement::Authenticated)
    }

    #[must_use]
    pub fn require_role(self, method: Method, path: &str, role: Role) -> Self {
        self.route(method, path, AuthRequirement::Role(role))
    }

    #[must_use]
    pub fn require_auth_by_default(mut self, required: bool) -> Self {
        self.require_auth_by_default = required;
        self
    }

    fn route(mut self, method: Method, path: &str, requirement: AuthRequirement) -> Self {
        self.routes.push((method, path.to_owned(), requirement));
        self
    }

    /// # Errors
    ///
    /// Returns [`RoutePolicyError`] for an invalid or conflicting pattern.
    pub fn build(self) -> Result<RoutePolicy, RoutePolicyError> {
        let mut matchers: HashMap<Method, matchit::Router<AuthRequirement>> = HashMap::new();

        for (method, path, requirement) in self.routes {
            matchers
                .entry(method.clone())
                .or_insert_with(matchit::Router::new)
                .insert(path.clone(), requirement)
                .map_err(|source| RoutePolicyError {
                    method,
                    path,
                    source,
                })?;
        }

        Ok(RoutePolicy {
            matchers: Arc::new(matchers),
            require_auth_by_default: self.require_auth_by_default,
        })
    }
}

/// Attach the caller's [`SecurityContext`] to the request.
///
/// A missing, malformed, badly signed or expired token leaves the request
/// anonymous. Rejection is the route guard's job.
pub async fn authorization_filter(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let ctx = extract_bearer_token(req.headers())
        .and_then(|token| codec.decode(token))
        .map_or_else(SecurityContext::anonymous, |claims| {
            SecurityContext::authenticated(claims.into_principal())
        });

    if let Some(username) = ctx.username() {
        tracing::debug!(username, "Request authenticated");
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Enforce the [`RoutePolicy`] against the context left by [`authorization_filter`].
pub async fn route_guard(
    State(policy): State<RoutePolicy>,
    req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let requirement = policy.resolve(req.method(), req.uri().path());
    let rejection = match req.extensions().get::<SecurityContext>() {
        Some(ctx) => rejection_for(requirement, ctx),
        None => rejection_for(requirement, &SecurityContext::anonymous()),
    };

    match rejection {
        Some(problem) => {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                status = problem.status,
                "Request rejected by route guard"
            );
            problem.with_instance(req.uri().path()).into_response()
        }
        None => next.run(req).await,
    }
}

fn rejection_for(requirement: AuthRequirement, ctx: &SecurityContext) -> Option<Problem> {
    if requirement == AuthRequirement::Public {
        return None;
    }
    if !ctx.is_authenticated() {
        return Some(Problem::unauthorized(
            "Missing, invalid or expired bearer token",
        ));
    }
    match requirement {
        AuthRequirement::Role(role) if !ctx.has_role(role) => Some(Problem::forbidden(format!(
            "Role {role} is required for this operation"
        ))),
        _ => None,
    }
}

/// Token from `Authorization: Bearer <token>`, if present.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX).map(str::trim))
        .filter(|token| !token.is_empty())
}

/// CORS preflight: OPTIONS with `Origin` and `Access-Control-Request-Method`.
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
