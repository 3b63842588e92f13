use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::Uri;
use parkapi_errors::Problem;
use tracing::field::Empty;

use super::dto::{LoginReq, TokenDto};
use super::error::domain_error_to_problem;
use crate::domain::service::AuthService;

/// Exchange username and password for a bearer token.
#[tracing::instrument(skip(svc, payload), fields(username = Empty))]
pub async fn login(
    uri: Uri,
    Extension(svc): Extension<Arc<AuthService>>,
    payload: Result<Json<LoginReq>, JsonRejection>,
) -> Result<Json<TokenDto>, Problem> {
    let Json(req_body) =
        payload.map_err(|e| Problem::bad_request(e.body_text()).with_instance(uri.path()))?;
    tracing::Span::current().record("username", req_body.username.as_str());

    if req_body.username.trim().is_empty() || req_body.password.is_empty() {
        return Err(
            Problem::bad_request("username and password are required").with_instance(uri.path())
        );
    }

    let token = svc
        .authenticate(&req_body.username, &req_body.password)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(Json(TokenDto::from(token)))
}
