/// Error handling for the API server
///
/// Provides a unified error type that maps to HTTP responses. All handlers
/// return `Result<T, ApiError>` which converts to the appropriate status
/// code and a sanitized JSON body. Internal details (store errors, token
/// validation specifics) are logged, never sent to the client.
///
/// # Taxonomy
///
/// | Variant            | Status | Meaning                                    |
/// |--------------------|--------|--------------------------------------------|
/// | BadRequest         | 400    | Malformed input (bad password length, bad  |
/// |                    |        | permission value)                          |
/// | Unauthorized       | 401    | Missing/invalid/expired/wrong-kind token   |
/// | Forbidden          | 403    | Authenticated but lacking role/permission  |
/// | NotFound           | 404    | Task absent or soft-deleted                |
/// | Conflict           | 409    | Duplicate email or duplicate share grant   |
/// | ValidationError    | 422    | Request DTO validation failures            |
/// | InternalError      | 500    | Store or hashing failure (logged)          |
/// | ServiceUnavailable | 503    | Database unreachable (health check)        |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use taskshare_shared::auth::access::AccessError;
use taskshare_shared::auth::jwt::TokenError;
use taskshare_shared::auth::password::PasswordError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409) - duplicate email or share
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Service unavailable (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "unauthorized", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique constraint violations become conflicts; the email and share
/// constraints are the two that reach handlers through normal input.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already registered".to_string());
                    }
                    if constraint.contains("shares") {
                        return ApiError::Conflict(
                            "Task already shared with this user".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request DTO validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(msg) => ApiError::InternalError(msg),
            TokenError::Invalid => ApiError::Unauthorized("Invalid or expired token".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort | PasswordError::TooLong => {
                ApiError::BadRequest(err.to_string())
            }
            PasswordError::HashError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert access-control errors to API errors
impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => ApiError::NotFound("Task not found".to_string()),
            AccessError::Forbidden => ApiError::Forbidden("No access to this task".to_string()),
            AccessError::AdminRequired => ApiError::Forbidden("Admin access required".to_string()),
            AccessError::Database(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid permission".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid permission");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");

        let err = ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Invalid email format".to_string(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ApiError::InternalError("boom".to_string()));
    }

    #[test]
    fn test_access_error_mapping() {
        let err: ApiError = AccessError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = AccessError::Forbidden.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AccessError::AdminRequired.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_password_error_mapping() {
        let err: ApiError = PasswordError::TooShort.into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = PasswordError::TooLong.into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = PasswordError::HashError("boom".to_string()).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_token_error_mapping() {
        let err: ApiError = TokenError::Invalid.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_into_response_statuses() {
        let response = ApiError::Unauthorized("no".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::Conflict("dup".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::ValidationError(vec![]).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
