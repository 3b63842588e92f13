use std::sync::Arc;

use axum::routing::post;
use axum::{Extension, Router};
use http::Method;

use super::handlers;
use crate::domain::service::AuthService;
use crate::middleware::RoutePolicyBuilder;

pub const AUTH_PATH: &str = "/api/v1/auth";

pub fn register_routes(router: Router, service: Arc<AuthService>) -> Router {
    router
        .route(AUTH_PATH, post(handlers::login))
        .layer(Extension(service))
}

#[must_use]
pub fn register_policy(policy: RoutePolicyBuilder) -> RoutePolicyBuilder {
    policy.public(Method::POST, AUTH_PATH)
}
