//! Backend entry-point: loads configuration, provisions the admin account and
//! serves the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]

mod server;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hbnb_backend::bootstrap::{AdminBootstrapSettings, ensure_admin_account};
use hbnb_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use hbnb_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, build_facade, build_http_state, create_server};

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

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let pool = match settings.database_url.clone() {
        Some(url) => Some(connect_database(url).await?),
        None => {
            info!("no database configured; data lives in memory");
            None
        }
    };
    let facade = build_facade(pool.as_ref());
    // CLI flags belong to ServerSettings; bootstrap reads env and files only.
    match AdminBootstrapSettings::load_from_iter(std::env::args_os().take(1)) {
        Ok(bootstrap) => {
            if let Err(e) = ensure_admin_account(&facade, &bootstrap).await {
                warn!(error = %e, "admin bootstrap failed; continuing without admin account");
            }
        }
        Err(e) => warn!(error = %e, "admin bootstrap settings invalid; skipping"),
    }

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    info!(%bind_addr, "starting HTTP server");
    create_server(build_http_state(facade), config)?.await
}

/// Apply pending migrations, then open the connection pool.
async fn connect_database(url: String) -> std::io::Result<DbPool> {
    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(url))
        .await
        .map_err(std::io::Error::other)
}
