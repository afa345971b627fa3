/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /register/                     # Worker signup (public)
/// ├── /login/  /logout/              # Session login/logout (public)
/// ├── /                              # Dashboard counts
/// ├── /list/  /task_.../  /task/     # Task operations
/// ├── /teams/  /team/                # Team operations
/// └── /workers/                      # Worker list and self profile edit
/// ```
///
/// Everything below the public block requires a valid session cookie; the
/// session middleware redirects everything else to `/login/`.
///
/// # Example
///
/// ```no_run
/// use taskhive_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
///
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhive_shared::auth::middleware::create_session_middleware;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the session signing secret
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: health, signup, and the session endpoints
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/register/",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/login/",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/logout/", get(routes::auth::logout));

    // Everything else requires a session
    let protected_routes = Router::new()
        .route("/", get(routes::dashboard::index))
        // ---- tasks ----
        .route("/list/", get(routes::tasks::list_tasks))
        .route("/task_detail/:id/", get(routes::tasks::task_detail))
        .route(
            "/task_create/create/",
            get(routes::tasks::create_task_form).post(routes::tasks::create_task),
        )
        .route(
            "/task_update/:id/update/",
            get(routes::tasks::update_task_form).post(routes::tasks::update_task),
        )
        .route(
            "/task_delete/:id/delete/",
            get(routes::tasks::delete_task_confirm).post(routes::tasks::delete_task),
        )
        .route("/task/:id/done/", get(routes::tasks::mark_task_done))
        // ---- teams ----
        .route("/teams/", get(routes::teams::list_teams))
        .route(
            "/team/create/",
            get(routes::teams::create_team_form).post(routes::teams::create_team),
        )
        .route("/team/:id/", get(routes::teams::team_detail))
        .route(
            "/teams/:id/update/",
            get(routes::teams::update_team_form).post(routes::teams::update_team),
        )
        .route(
            "/teams/:id/delete/",
            get(routes::teams::delete_team_confirm).post(routes::teams::delete_team),
        )
        // ---- workers ----
        .route("/workers/", get(routes::workers::list_workers))
        .route(
            "/workers/update/",
            get(routes::workers::update_profile_form).post(routes::workers::update_profile),
        )
        .layer(axum::middleware::from_fn(create_session_middleware(
            state.session_secret().to_string(),
        )));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
