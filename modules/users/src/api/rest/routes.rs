use std::sync::Arc;

use auth::RoutePolicyBuilder;
use axum::routing::get;
use axum::{Extension, Router};
use http::Method;
use parkapi_security::Role;

use super::handlers;
use crate::domain::service::UsersService;

pub const USERS_PATH: &str = "/api/v1/usuarios";
pub const USER_PATH: &str = "/api/v1/usuarios/{id}";

pub fn register_routes(router: Router, service: Arc<UsersService>) -> Router {
    router
        .route(
            USERS_PATH,
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            USER_PATH,
            get(handlers::get_user).patch(handlers::update_password),
        )
        .layer(Extension(service))
}

/// Access rules for the routes above.
///
/// Single-user reads and password changes are authenticated here; ownership is
/// checked by the service.
#[must_use]
pub fn register_policy(policy: RoutePolicyBuilder) -> RoutePolicyBuilder {
    policy
        .public(Method::POST, USERS_PATH)
        .require_role(Method::GET, USERS_PATH, Role::Admin)
        .authenticated(Method::GET, USER_PATH)
        .authenticated(Method::PATCH, USER_PATH)
}
