//! Service wiring, router assembly and the server loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::middleware::{authorization_filter, route_guard};
use auth::{AuthConfig, AuthService, Clock, PasswordHasher, RoutePolicy, SystemClock, TokenCodec};
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use http::{HeaderValue, Method};
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use users::{InMemoryUserRepository, UsersService};

use crate::config::{AppConfig, BootstrapAdminConfig, CorsConfig, ServerConfig};
use crate::web::{self, HEALTH_PATH};

/// Long-lived services shared by all requests.
pub struct Services {
    pub codec: Arc<TokenCodec>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UsersService>,
}

impl Services {
    #[must_use]
    pub fn new(cfg: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let repo = Arc::new(InMemoryUserRepository::new());
        let codec = Arc::new(TokenCodec::new(&cfg.jwt, clock));
        let auth = Arc::new(AuthService::new(
            repo.clone(),
            codec.clone(),
            PasswordHasher::from_config(&cfg.password),
        ));
        let users = Arc::new(UsersService::new(repo, auth.clone()));

        Self {
            codec,
            auth,
            users,
        }
    }

    /// Seed the configured admin account, if any.
    ///
    /// # Errors
    ///
    /// Fails if the account does not pass registration validation.
    pub async fn bootstrap_admin(&self, admin: Option<&BootstrapAdminConfig>) -> anyhow::Result<()> {
        let Some(admin) = admin else {
            tracing::debug!("No bootstrap admin configured");
            return Ok(());
        };

        self.users
            .ensure_admin(&admin.username, admin.password.expose_secret())
            .await
            .with_context(|| format!("failed to seed bootstrap admin '{}'", admin.username))?;
        Ok(())
    }
}

/// Access rules for every route the server exposes.
///
/// # Errors
///
/// Fails if two modules register conflicting paths.
pub fn route_policy() -> anyhow::Result<RoutePolicy> {
    let policy = RoutePolicy::builder().public(Method::GET, HEALTH_PATH);
    let policy = auth::api::rest::routes::register_policy(policy);
    let policy = users::api::rest::routes::register_policy(policy);
    policy.build().context("failed to build route policy")
}

/// Assemble routes and the middleware stack.
///
/// # Errors
///
/// Fails on an invalid route policy or CORS origin.
pub fn build_router(services: &Services, server: &ServerConfig) -> anyhow::Result<Router> {
    let mut router = Router::new().route(HEALTH_PATH, get(web::health_check));
    router = auth::api::rest::routes::register_routes(router, services.auth.clone());
    router = users::api::rest::routes::register_routes(router, services.users.clone());

    // Layers run outermost first, so they are added innermost first.

    // 4) Reject requests the policy does not allow
    router = router.layer(from_fn_with_state(route_policy()?, route_guard));

    // 3) Establish the security context from the bearer token
    router = router.layer(from_fn_with_state(
        services.codec.clone(),
        authorization_filter,
    ));

    // 2) CORS (outer to auth so preflight short-circuits)
    if server.cors_enabled {
        router = router.layer(build_cors_layer(&server.cors)?);
    }

    // 1) Trace
    router = router.layer({
        use tower_http::trace::TraceLayer;
        use tracing::field::Empty;

        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                },
            )
    });

    Ok(router)
}

fn build_cors_layer(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cfg.max_age_seconds));

    if cfg.allowed_origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Serve until `shutdown` resolves.
///
/// # Errors
///
/// Fails on invalid configuration, a bind failure or a server error.
pub async fn run<F>(config: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;
    let addr = config.bind_addr()?;

    let services = Services::new(&config.auth, Arc::new(SystemClock));
    services
        .bootstrap_admin(config.bootstrap_admin.as_ref())
        .await?;
    let router = build_router(&services, &config.server)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use auth::AuthRequirement;
    use parkapi_security::Role;

    #[test]
    fn policy_covers_every_module() {
        let policy = route_policy().unwrap();

        assert_eq!(policy.resolve(&Method::GET, "/health"), AuthRequirement::Public);
        assert_eq!(policy.resolve(&Method::POST, "/api/v1/auth"), AuthRequirement::Public);
        assert_eq!(policy.resolve(&Method::POST, "/api/v1/usuarios"), AuthRequirement::Public);
        assert_eq!(
            policy.resolve(&Method::GET, "/api/v1/usuarios"),
            AuthRequirement::Role(Role::Admin)
        );
        assert_eq!(
            policy.resolve(&Method::PATCH, "/api/v1/usuarios/3"),
            AuthRequirement::Authenticated
        );
        assert_eq!(
            policy.resolve(&Method::GET, "/api/v1/unknown"),
            AuthRequirement::Authenticated
        );
    }

    #[test]
    fn cors_rejects_invalid_origin() {
        let cfg = CorsConfig {
            allowed_origins: vec!["https://ok.example".to_owned(), "bad\norigin".to_owned()],
            max_age_seconds: 60,
        };
        assert!(build_cors_layer(&cfg).is_err());
    }

    #[test]
    fn cors_accepts_wildcard() {
        assert!(build_cors_layer(&CorsConfig::default()).is_ok());
    }
}
