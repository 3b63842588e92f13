use http::StatusCode;
use parkapi_errors::Problem;

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem.
#[must_use]
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::InvalidCredentials => Problem::bad_request("Invalid credentials"),
        DomainError::UserNotFound { .. } => Problem::not_found(e.to_string()),
        DomainError::PasswordMismatch | DomainError::WrongCurrentPassword => {
            Problem::bad_request(e.to_string())
        }
        DomainError::DuplicateUsername(_) => {
            Problem::new(StatusCode::CONFLICT, "Conflict", e.to_string())
        }
        DomainError::Token(_) | DomainError::Internal(_) => {
            tracing::error!(error = %e, "Internal auth error");
            Problem::internal("An internal error occurred")
        }
    };
    problem.with_instance(instance).with_current_trace()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::token::TokenError;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (DomainError::InvalidCredentials, 400),
            (DomainError::user_not_found("ghost@email.com"), 404),
            (DomainError::PasswordMismatch, 400),
            (DomainError::WrongCurrentPassword, 400),
            (DomainError::DuplicateUsername("tody@email.com".to_owned()), 409),
            (DomainError::internal("boom"), 500),
            (
                DomainError::Token(TokenError::Encoding("bad key".to_owned())),
                500,
            ),
        ];

        for (err, status) in cases {
            let problem = domain_error_to_problem(&err, "/api/v1/auth");
            assert_eq!(problem.status, status, "{err}");
            assert_eq!(problem.instance.as_deref(), Some("/api/v1/auth"));
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let problem = domain_error_to_problem(&DomainError::internal("db password=hunter2"), "/");
        assert!(!problem.detail.contains("hunter2"));
    }
}
