/// Session token generation and validation
///
/// Sessions are HS256-signed JWTs whose subject is the authenticated
/// worker's ID. Tokens live for 24 hours and carry the "taskhive" issuer;
/// validation checks signature, expiry, and issuer.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::session::{create_session_token, validate_session_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let worker_id = Uuid::new_v4();
///
/// let claims = Claims::new(worker_id);
/// let token = create_session_token(&claims, "secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_session_token(&token, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, worker_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer checked on validation
const ISSUER: &str = "taskhive";

/// Session lifetime
const SESSION_TTL_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,

    /// Wrong issuer
    #[error("Invalid session issuer")]
    InvalidIssuer,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - worker ID
    pub sub: Uuid,

    /// Issuer - always "taskhive"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates session claims for a worker with the default lifetime
    pub fn new(worker_id: Uuid) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(SESSION_TTL_HOURS);

        Self {
            sub: worker_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

/// Signs session claims into a token string
///
/// # Errors
///
/// Returns `SessionError::CreateError` if signing fails.
pub fn create_session_token(claims: &Claims, secret: &str) -> Result<String, SessionError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Validates a session token and returns its claims
///
/// # Errors
///
/// Returns `SessionError::Expired` for a stale token,
/// `SessionError::InvalidIssuer` for a wrong issuer, and
/// `SessionError::ValidationError` for any other failure (bad signature,
/// malformed token).
pub fn validate_session_token(token: &str, secret: &str) -> Result<Claims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => SessionError::InvalidIssuer,
        _ => SessionError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_new() {
        let worker_id = Uuid::new_v4();
        let claims = Claims::new(worker_id);

        assert_eq!(claims.sub, worker_id);
        assert_eq!(claims.iss, "taskhive");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_roundtrip() {
        let worker_id = Uuid::new_v4();
        let claims = Claims::new(worker_id);

        let token = create_session_token(&claims, SECRET).unwrap();
        let validated = validate_session_token(&token, SECRET).unwrap();

        assert_eq!(validated.sub, worker_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4());
        let token = create_session_token(&claims, SECRET).unwrap();

        let result = validate_session_token(&token, "a-different-secret-of-32-bytes!!");
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = validate_session_token("not.a.token", SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let worker_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims {
            sub: worker_id,
            iss: "taskhive".to_string(),
            iat: (now - Duration::hours(48)).timestamp(),
            exp: (now - Duration::hours(24)).timestamp(),
        };

        let token = create_session_token(&claims, SECRET).unwrap();
        let result = validate_session_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let worker_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims {
            sub: worker_id,
            iss: "someone-else".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let token = create_session_token(&claims, SECRET).unwrap();
        let result = validate_session_token(&token, SECRET);
        assert!(matches!(result, Err(SessionError::InvalidIssuer)));
    }
}
