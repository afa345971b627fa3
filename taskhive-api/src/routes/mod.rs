/// Route handlers, organized by resource
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout
/// - `dashboard`: Entity counts for the landing page
/// - `tasks`: Task list/detail/create/update/delete/mark-done
/// - `teams`: Team list/detail/create/update/delete
/// - `workers`: Worker list and self profile edit

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod tasks;
pub mod teams;
pub mod workers;
