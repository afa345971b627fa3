/// Session middleware for Axum
///
/// Protected routes are wrapped in middleware that reads the session cookie,
/// validates the token, and inserts a [`Session`] into the request
/// extensions for handlers to extract. Requests without a valid session are
/// redirected to the login path — they never reach the handler.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Extension, Router};
/// use axum::middleware::from_fn;
/// use taskhive_shared::auth::middleware::{create_session_middleware, Session};
///
/// async fn protected(Extension(session): Extension<Session>) -> String {
///     format!("Hello, worker {}!", session.worker_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(protected))
///     .layer(from_fn(create_session_middleware("session-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::validate_session_token;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "taskhive_session";

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login/";

/// Authenticated session added to request extensions
///
/// The worker ID comes from the validated token, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated worker ID
    pub worker_id: Uuid,
}

/// Builds the Set-Cookie value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        SESSION_COOKIE, token
    )
}

/// Builds the Set-Cookie value clearing the session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extracts the session token from the Cookie header, if present
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let pair = pair.trim();
        pair.strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(|token| token.to_string())
    })
}

/// Session authentication middleware
///
/// Validates the session cookie and inserts a [`Session`] extension.
/// A missing, malformed, or expired session yields `303 See Other` to the
/// login path.
pub async fn session_auth_middleware(secret: String, mut req: Request, next: Next) -> Response {
    let Some(token) = extract_session_token(req.headers()) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let claims = match validate_session_token(&token, &secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting invalid session");
            return Redirect::to(LOGIN_PATH).into_response();
        }
    };

    req.extensions_mut().insert(Session {
        worker_id: claims.sub,
    });

    next.run(req).await
}

/// Creates a session middleware closure capturing the secret
///
/// For use with `axum::middleware::from_fn`.
pub fn create_session_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(session_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123");
        assert!(cookie.starts_with("taskhive_session=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("taskhive_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_session_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; taskhive_session=tok123; lang=en"),
        );

        assert_eq!(extract_session_token(&headers), Some("tok123".to_string()));
    }

    #[test]
    fn test_extract_session_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_extract_session_token_ignores_prefixed_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("taskhive_session_old=stale"),
        );
        assert_eq!(extract_session_token(&headers), None);
    }
}
