/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskshare_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use taskshare_shared::auth::jwt::TokenService;
use taskshare_shared::auth::middleware::create_auth_middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token issuance and validation
    pub tokens: TokenService,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token service is constructed here from the configured secret and
    /// TTLs; nothing reads the secret ambiently at call time.
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = TokenService::new(
            &config.auth.jwt_secret,
            Duration::minutes(config.auth.access_ttl_minutes),
            Duration::days(config.auth.refresh_ttl_days),
        );

        Self {
            db,
            config: Arc::new(config),
            tokens,
        }
    }
}

/// Builds the complete axum router
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health               # Health check (public)
/// ├── POST /register             # Registration (public)
/// ├── POST /login                # Login, sets refresh cookie (public)
/// ├── POST /refresh              # Token rotation via cookie (public)
/// ├── POST /logout               # Clears refresh cookie (public)
/// ├── GET  /me                   # Current user profile
/// ├── /tasks                     # Task CRUD + sharing (authenticated)
/// │   ├── GET    /
/// │   ├── POST   /
/// │   ├── PUT    /:task_id
/// │   ├── DELETE /:task_id
/// │   └── POST   /:task_id/share
/// └── /admin                     # Admin-only (authenticated + role check)
///     ├── GET    /users
///     ├── GET    /tasks
///     └── DELETE /tasks/:task_id
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer authentication on the protected subtree
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout));

    let task_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:task_id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/:task_id/share", post(routes::tasks::share_task));

    // Admin role is checked inside the handlers; the layer below only
    // establishes identity.
    let admin_routes = Router::new()
        .route("/admin/users", get(routes::admin::list_users))
        .route("/admin/tasks", get(routes::admin::list_tasks))
        .route("/admin/tasks/:task_id", delete(routes::admin::delete_task));

    let protected_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .merge(task_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(create_auth_middleware(
            state.tokens.clone(),
        )));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
