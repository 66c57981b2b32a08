//! Backend entry-point: loads settings, prepares the record store and serves
//! the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use civic_backend::inbound::http::health::HealthState;
use civic_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use civic_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| {
        std::io::Error::other(format!("failed to load configuration: {e}"))
    })?;

    let mut config = ServerConfig::new(settings.bind_addr(), settings.public_base_url());
    let pool = match settings.database_url() {
        Some(url) => Some(connect_store(url, settings.db_max_connections).await?),
        None => {
            info!("no database URL configured; using the in-memory store");
            None
        }
    };
    if let Some(pool) = &pool {
        config = config.with_db_pool(pool.clone());
    }

    let health_state = web::Data::new(HealthState::new(pool));
    info!(addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Apply pending migrations and open the connection pool.
async fn connect_store(database_url: &str, max_connections: u32) -> std::io::Result<DbPool> {
    run_migrations(database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_connections))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(max_connections, "database pool ready");
    Ok(pool)
}
