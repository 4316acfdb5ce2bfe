use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use interfaces_bing_image_archive::index::{BuildClientError, ImageArchiveClient, DEFAULT_TIMEOUT};
use projects_wallpapers::{
    config::{ConfigError, Settings, DEFAULT_ENV_FILE},
    crawler::sync::sync_regions,
    db::{build_pool, run_migrations, store::PgWallpaperStore, RunMigrationsError},
    regions::UnknownRegionError,
};
use thiserror::Error;
use tracing::{error, info};
use utils_trace::tracing_init;

/// Fetches today's wallpaper for each market and upserts it.
#[derive(Debug, Parser)]
#[command(name = "wallpapers-fetch", version)]
struct Args {
    /// Env file holding DB_* settings.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Market to fetch; repeat for several. Defaults to every configured region.
    #[arg(long = "region", value_name = "CODE")]
    regions: Vec<String>,
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
    #[error(transparent)]
    UnknownRegion {
        #[from]
        source: UnknownRegionError,
    },
    #[error("BuildClient: {source}")]
    BuildClient {
        #[from]
        source: BuildClientError,
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
    #[error("{failed} of {total} regions failed to sync")]
    RegionsFailed { failed: usize, total: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fetch run failed");
            eprintln!("wallpapers-fetch: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), MainError> {
    let settings = Settings::load(&args.env_file)?;

    tracing_init(&settings.log_level, settings.log_format)
        .map_err(|source| MainError::TracingInit { source })?;

    let targets: Vec<String> = if args.regions.is_empty() {
        settings.regions.codes().to_vec()
    } else {
        args.regions
            .iter()
            .map(|code| settings.regions.validate(code.trim()).map(str::to_string))
            .collect::<Result<_, _>>()?
    };

    let client = ImageArchiveClient::new(&settings.archive_base_url, DEFAULT_TIMEOUT)?;

    let pool = build_pool(&settings.database.connection_string())
        .map_err(|source| MainError::BuildPool { source })?;
    run_migrations(&pool)?;

    let store = Arc::new(PgWallpaperStore::new(pool));
    let report = sync_regions(store, client, settings.regions.clone(), &targets).await;

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "fetch run finished"
    );

    if report.failed() > 0 {
        return Err(MainError::RegionsFailed {
            failed: report.failed(),
            total: report.outcomes.len(),
        });
    }
    Ok(())
}
