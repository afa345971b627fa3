/// Authentication endpoints
///
/// Registration creates a worker and immediately establishes a session;
/// login verifies credentials against the stored Argon2id hash and mints a
/// session token; logout clears the cookie. All three respond with
/// redirects, matching the rest of the application.
///
/// # Endpoints
///
/// - `GET/POST /register/` - signup form context / submit (no auth required)
/// - `GET/POST /login/` - login form context / submit
/// - `GET /logout/` - clear session, redirect to login

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskhive_shared::auth::{
    middleware::{clear_session_cookie, session_cookie, LOGIN_PATH},
    password,
    session::{create_session_token, Claims},
};
use taskhive_shared::models::{
    position::Position,
    worker::{CreateWorker, Worker},
};
use uuid::Uuid;
use validator::Validate;

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterPayload {
    /// Login name
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Given name
    #[validate(length(min = 1, max = 255, message = "First name must be 1-255 characters"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, max = 255, message = "Last name must be 1-255 characters"))]
    pub last_name: String,

    /// Position held by the new worker
    pub position_id: Uuid,

    /// Password (strength policy applies)
    pub password: String,

    /// Password confirmation; must match `password`
    pub password_confirm: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

/// Registration form context: the position choices
#[derive(Debug, Serialize)]
pub struct RegisterFormContext {
    pub positions: Vec<Position>,
}

/// Login form context
#[derive(Debug, Serialize)]
pub struct LoginFormContext {
    pub detail: &'static str,
}

/// Builds a redirect response that also establishes the session cookie
fn session_redirect(token: &str, location: &str) -> ApiResult<Response> {
    let cookie = HeaderValue::from_str(&session_cookie(token))
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie value: {}", e)))?;

    let mut response = Redirect::to(location).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Registration form context handler
pub async fn register_form(
    State(state): State<AppState>,
) -> ApiResult<Json<RegisterFormContext>> {
    Ok(Json(RegisterFormContext {
        positions: Position::list(&state.db).await?,
    }))
}

/// Registration handler
///
/// Rejects mismatched password fields, weak passwords, and taken
/// usernames/emails. On success the new worker is logged in and redirected
/// to the dashboard.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterPayload>,
) -> ApiResult<Response> {
    req.validate()?;

    if req.password != req.password_confirm {
        return Err(ApiError::field(
            "password_confirm",
            "The two password fields didn't match.",
        ));
    }

    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::field("password", &message))?;

    let password_hash = password::hash_password(&req.password)?;

    let worker = Worker::create(
        &state.db,
        CreateWorker {
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            position_id: req.position_id,
        },
    )
    .await?;

    Worker::update_last_login(&state.db, worker.id).await?;

    tracing::info!(worker_id = %worker.id, username = %worker.username, "Worker registered");

    let token = create_session_token(&Claims::new(worker.id), state.session_secret())?;
    session_redirect(&token, "/")
}

/// Login form context handler
pub async fn login_form() -> Json<LoginFormContext> {
    Json(LoginFormContext {
        detail: "Authentication required. Submit username and password to this path.",
    })
}

/// Login handler
///
/// Verifies the password against the stored hash. Failures are reported as
/// a field-level message without revealing which part was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginPayload>,
) -> ApiResult<Response> {
    let worker = Worker::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::field("username", "Invalid username or password"))?;

    let valid = password::verify_password(&req.password, &worker.password_hash)?;
    if !valid {
        return Err(ApiError::field("username", "Invalid username or password"));
    }

    Worker::update_last_login(&state.db, worker.id).await?;

    tracing::info!(worker_id = %worker.id, username = %worker.username, "Worker logged in");

    let token = create_session_token(&Claims::new(worker.id), state.session_secret())?;
    session_redirect(&token, "/")
}

/// Logout handler
///
/// Clears the session cookie and redirects to the login path.
pub async fn logout() -> ApiResult<Response> {
    let cookie = HeaderValue::from_str(&clear_session_cookie())
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie value: {}", e)))?;

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(overrides: serde_json::Value) -> serde_json::Value {
        let mut base = json!({
            "username": "john",
            "email": "john@example.com",
            "first_name": "John",
            "last_name": "Doe",
            "position_id": "550e8400-e29b-41d4-a716-446655440000",
            "password": "Sup3rSecret",
            "password_confirm": "Sup3rSecret"
        });
        base.as_object_mut()
            .unwrap()
            .extend(overrides.as_object().unwrap().clone());
        base
    }

    #[test]
    fn test_register_payload_valid() {
        let req: RegisterPayload = serde_json::from_value(payload(json!({}))).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_payload_bad_email() {
        let req: RegisterPayload =
            serde_json::from_value(payload(json!({"email": "nope"}))).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_payload_empty_username() {
        let req: RegisterPayload =
            serde_json::from_value(payload(json!({"username": ""}))).unwrap();
        assert!(req.validate().is_err());
    }
}
