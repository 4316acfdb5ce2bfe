use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use projects_wallpapers::{
    config::{ConfigError, Settings, DEFAULT_ENV_FILE},
    db::{build_pool, run_migrations, store::PgWallpaperStore, RunMigrationsError},
    endpoints::{router, AppState},
};
use thiserror::Error;
use tracing::info;
use utils_trace::tracing_init;

/// Read-only HTTP API over the stored wallpapers.
#[derive(Debug, Parser)]
#[command(name = "wallpapers-api", version)]
struct Args {
    /// Env file holding DB_* and API_* settings.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[from]
        source: ConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("BuildPool: {source}")]
    BuildPool {
        #[source]
        source: r2d2::Error,
    },
    #[error("RunMigrations: {source}")]
    RunMigrations {
        #[from]
        source: RunMigrationsError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let args = Args::parse();
    let settings = Settings::load(&args.env_file)?;
    let api = settings.require_api()?.clone();

    tracing_init(&settings.log_level, settings.log_format)
        .map_err(|source| MainError::TracingInit { source })?;

    let pool = build_pool(&settings.database.connection_string())
        .map_err(|source| MainError::BuildPool { source })?;
    let applied = run_migrations(&pool)?;
    info!(applied, "database schema up to date");

    let state = AppState::new(Arc::new(PgWallpaperStore::new(pool)), settings.regions.clone());
    let app = router(state, settings.error_status);

    let addr = api.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!("Server running on addr: {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|source| MainError::Serve { source })?;

    Ok(())
}
