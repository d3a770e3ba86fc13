//! # TaskShare API Server
//!
//! Multi-tenant task-tracking service with authentication, role-based access
//! control, and per-task sharing permissions.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskshare-api
//! ```

use taskshare_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskshare_shared::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskshare_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskShare API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // A missing JWT_SECRET fails here, before anything is served
    let config = Config::from_env()?;

    let pool = create_pool(&DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    })
    .await?;

    sqlx::migrate!("../migrations").run(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
