/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the strength policy
/// - [`session`]: Signed session tokens (HS256)
/// - [`middleware`]: Session-cookie middleware for protected routes
///
/// Credentials are verified against Argon2id hashes; a successful login or
/// registration mints a signed session token carried in an HttpOnly cookie.
/// Requests without a valid session are redirected to the login path.

pub mod middleware;
pub mod password;
pub mod session;
