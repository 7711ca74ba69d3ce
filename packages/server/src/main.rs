use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use exam_server::config::AppConfig;
use exam_server::state::AppState;
use exam_server::utils::rate_limit::{RateLimiter, spawn_sweep_task};
use exam_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::seed_role_permissions(&db).await?;
    seed::seed_bootstrap_admin(&db, &config.auth.bootstrap_admin).await?;
    seed::ensure_indexes(&db).await?;

    let rate_limiter = Arc::new(RateLimiter::new(
        Duration::from_secs(config.rate_limit.window_secs),
        config.rate_limit.max_tracked_clients,
    ));
    spawn_sweep_task(
        rate_limiter.clone(),
        Duration::from_secs(config.rate_limit.sweep_interval_secs),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host/server.port")?;

    let state = AppState {
        db,
        config: Arc::new(config),
        rate_limiter,
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui and http://{}/scalar", addr, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
