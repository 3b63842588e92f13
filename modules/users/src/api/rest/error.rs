use http::StatusCode;
use parkapi_errors::Problem;

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem.
#[must_use]
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::Validation { .. } => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
            e.to_string(),
        ),
        DomainError::InvalidPassword(_) => Problem::bad_request(e.to_string()),
        DomainError::DuplicateUsername(_) => {
            Problem::new(StatusCode::CONFLICT, "Conflict", e.to_string())
        }
        DomainError::UserNotFound { .. } => Problem::not_found(e.to_string()),
        DomainError::Forbidden => {
            Problem::forbidden("You do not have permission to perform this action")
        }
        DomainError::Auth(inner) => {
            return auth::api::rest::error::domain_error_to_problem(inner, instance);
        }
        DomainError::Internal(_) => {
            tracing::error!(error = %e, "Internal users error");
            Problem::internal("An internal error occurred")
        }
    };
    problem.with_instance(instance).with_current_trace()
}
