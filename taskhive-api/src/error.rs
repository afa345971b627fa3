/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`, which converts to the right status code and a
/// JSON body — except `Unauthorized`, which renders as a redirect to the
/// login path, matching the application's redirect-based auth contract.
///
/// # Example
///
/// ```ignore
/// use taskhive_api::error::ApiResult;
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     let data = fetch_data().await?;
///     Ok(Json(serde_json::json!({ "data": data })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskhive_shared::auth::middleware::LOGIN_PATH;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Missing or invalid session — redirects to the login path (303)
    Unauthorized,

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate name or email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<FieldError>),

    /// Internal server error (500)
    InternalError(String),
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional field-level errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Shorthand for a single-field validation error
    pub fn field(field: &str, message: &str) -> Self {
        ApiError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Auth failures never surface data or a JSON error: the contract is
        // a redirect to the login path.
        if let ApiError::Unauthorized = self {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized => unreachable!("handled above"),
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
/// Unique violations are mapped back to a field-level conflict message by
/// constraint name; foreign-key violations mean the submitted reference
/// does not exist.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("");

                if db_err.is_unique_violation() {
                    let message = if constraint.contains("username") {
                        "Username already exists"
                    } else if constraint.contains("email") {
                        "Email already exists"
                    } else if constraint.starts_with("positions") {
                        "Position name already exists"
                    } else if constraint.starts_with("task_types") {
                        "Task type name already exists"
                    } else if constraint.starts_with("teams") {
                        "Team name already exists"
                    } else {
                        "Duplicate value"
                    };
                    return ApiError::Conflict(message.to_string());
                }

                if db_err.is_foreign_key_violation() {
                    return ApiError::BadRequest(
                        "A referenced record does not exist".to_string(),
                    );
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator errors to API errors with field-level details
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<FieldError> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    }
}

/// Convert password errors to API errors
impl From<taskhive_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskhive_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session errors to API errors
impl From<taskhive_shared::auth::session::SessionError> for ApiError {
    fn from(_: taskhive_shared::auth::session::SessionError) -> Self {
        ApiError::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ApiError::field("deadline", "Deadline cannot be in the past!");
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            LOGIN_PATH
        );
    }

    #[test]
    fn test_validation_error_status() {
        let response = ApiError::field("name", "Required").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_found_status() {
        let response = ApiError::NotFound("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
