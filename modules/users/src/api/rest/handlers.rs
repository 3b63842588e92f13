use std::sync::Arc;

use auth_sdk::UserId;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use parkapi_errors::Problem;
use parkapi_security::SecurityContext;
use tracing::field::Empty;

use super::dto::{CreateUserReq, UpdatePasswordReq, UserDto};
use super::error::domain_error_to_problem;
use crate::domain::service::UsersService;

fn body_rejection(e: &JsonRejection, uri: &Uri) -> Problem {
    Problem::new(e.status(), "Invalid request body", e.body_text()).with_instance(uri.path())
}

/// Register a new user
#[tracing::instrument(skip(svc, payload), fields(username = Empty))]
pub async fn create_user(
    uri: Uri,
    Extension(svc): Extension<Arc<UsersService>>,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<Response, Problem> {
    let Json(req_body) = payload.map_err(|e| body_rejection(&e, &uri))?;
    tracing::Span::current().record("username", req_body.username.as_str());

    let user = svc
        .create_user(&req_body.username, &req_body.password)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(user)),
    )
        .into_response())
}

/// Get a specific user by id
#[tracing::instrument(skip(svc, ctx), fields(user.id = id, requester = ctx.username()))]
pub async fn get_user(
    uri: Uri,
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<UserId>,
) -> Result<Json<UserDto>, Problem> {
    let user = svc
        .get_user(&ctx, id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(Json(UserDto::from(user)))
}

/// List all users
#[tracing::instrument(skip(svc, ctx), fields(requester = ctx.username()))]
pub async fn list_users(
    uri: Uri,
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<UsersService>>,
) -> Result<Json<Vec<UserDto>>, Problem> {
    let users = svc
        .list_users(&ctx)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Change the caller's password
#[tracing::instrument(skip(svc, ctx, payload), fields(user.id = id, requester = ctx.username()))]
pub async fn update_password(
    uri: Uri,
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<UserId>,
    payload: Result<Json<UpdatePasswordReq>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let Json(req_body) = payload.map_err(|e| body_rejection(&e, &uri))?;

    svc.change_password(
        &ctx,
        id,
        &req_body.current_password,
        &req_body.new_password,
        &req_body.confirm_password,
    )
    .await
    .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(StatusCode::NO_CONTENT)
}
