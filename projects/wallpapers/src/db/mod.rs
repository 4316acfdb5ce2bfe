pub mod schema;
pub mod wallpaper;
pub mod store;
pub mod memory;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn build_pool(database_url: &str) -> Result<PgPool, r2d2::Error> {
    Pool::builder().build(ConnectionManager::<PgConnection>::new(database_url))
}

#[derive(Debug, Error)]
pub enum RunMigrationsError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("RunPendingMigrations: {message}")]
    RunPendingMigrations { message: String },
}

/// Brings the schema up to date. Both binaries call this before doing anything else.
pub fn run_migrations(pool: &PgPool) -> Result<usize, RunMigrationsError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| RunMigrationsError::RunPendingMigrations { message: err.to_string() })?;
    Ok(applied.len())
}
