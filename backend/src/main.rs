//! Backend entry-point: loads settings, prepares storage and runs the HTTP
//! server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bugtracker::config::AppSettings;
use bugtracker::inbound::http::health::HealthState;
use bugtracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use bugtracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let mut config = ServerConfig::new(session, settings.bind_addr(), settings.upload_dir())
        .with_max_upload_bytes(settings.max_upload_bytes());
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect(url, &settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server terminated")
}

async fn connect(url: &str, settings: &AppSettings) -> Result<DbPool> {
    if settings.run_migrations() {
        let owned = url.to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&owned))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to run migrations")?;
        info!(applied, "database schema up to date");
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;
    info!(max_size = settings.pool_max_size(), "database pool ready");
    Ok(pool)
}
