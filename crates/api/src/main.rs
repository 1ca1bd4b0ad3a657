use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use attendance_api::app::{create_app, AppState};
use attendance_api::config::Config;
use attendance_api::middleware::{init_metrics, logging::init_logging};
use attendance_api::services::admin_bootstrap::bootstrap_admin;
use persistence::repositories::RoleLookup;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Attendance API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let roles = RoleLookup::load(&pool)
        .await
        .context("Failed to load course roles")?;

    if let Some(account_id) = bootstrap_admin(&pool, &config.admin).await? {
        info!(account_id, "Admin bootstrap completed");
    }

    tokio::spawn(publish_pool_metrics(pool.clone()));

    let addr = config.socket_addr()?;
    let state = AppState::new(config, pool, roles).context("Invalid JWT configuration")?;
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn publish_pool_metrics(pool: sqlx::PgPool) {
    let mut interval = tokio::time::interval(Duration::from_secs(15));
    loop {
        interval.tick().await;
        persistence::metrics::record_pool_metrics(&pool);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
