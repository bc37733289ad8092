use anyhow::Context;
use axum_db_admin::DbAdminLayer;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::{Path, PathBuf};

mod config;
mod database;
mod logging;

use config::ServerConfig;
use database::Backend;

/// Browser-based database administration server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file; defaults apply when it is missing
    #[arg(short, long, default_value = "db-admin.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args.config)?;

    logging::init_logging(&config.logging.level, &config.logging.format)?;
    tracing::info!(config = %args.config.display(), "configuration loaded");

    let admin_router = match Backend::from_url(&config.database.url)? {
        Backend::Sqlite => {
            ensure_sqlite_directory(&config.database.url)?;
            let pool = SqlitePoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to SQLite database")?;

            if config.database.seed_demo_data {
                database::setup(&pool).await.context("Failed to setup database")?;
            }

            DbAdminLayer::sqlite(pool, config.admin.clone()).into_router()
        }
        Backend::Postgres => {
            if config.database.seed_demo_data {
                tracing::warn!("seed_demo_data only applies to SQLite, skipping");
            }

            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to PostgreSQL database")?;

            DbAdminLayer::postgres(pool, config.admin.clone()).into_router()
        }
    };

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    tracing::info!("Server running at http://{}", address);
    tracing::info!("Health check at http://{}/health", address);

    axum::serve(listener, admin_router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Create the parent directory of a file-backed SQLite database
fn ensure_sqlite_directory(database_url: &str) -> anyhow::Result<()> {
    let location = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let location = location.split('?').next().unwrap_or_default();

    if location.is_empty() || location == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(location).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown signal received");
}
