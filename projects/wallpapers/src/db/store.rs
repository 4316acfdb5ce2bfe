//! Storage seam shared by the crawler and the HTTP API.
//!
//! [`PgWallpaperStore`] checks a pooled connection out per call and runs the
//! diesel query on the blocking pool; the connection goes back to the pool
//! when the closure returns, whether it succeeded or not.

use async_trait::async_trait;
use diesel::PgConnection;
use thiserror::Error;

use crate::db::{
    wallpaper::{
        models::{NewWallpaper, WallpaperSummary},
        queries::{
            get_wallpaper_by_date, list_region_wallpapers, list_wallpapers_by_date,
            upsert_wallpaper, GetWallpaperByDateError, ListRegionWallpapersError,
            ListWallpapersByDateError, UpsertWallpaperError,
        },
    },
    PgPool,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error(transparent)]
    UpsertWallpaper {
        #[from]
        source: UpsertWallpaperError,
    },
    #[error(transparent)]
    ListRegionWallpapers {
        #[from]
        source: ListRegionWallpapersError,
    },
    #[error(transparent)]
    GetWallpaperByDate {
        #[from]
        source: GetWallpaperByDateError,
    },
    #[error(transparent)]
    ListWallpapersByDate {
        #[from]
        source: ListWallpapersByDateError,
    },
    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

#[async_trait]
pub trait WallpaperStore: Send + Sync {
    /// Insert-or-overwrite keyed by (region, hash).
    async fn upsert(&self, wallpaper: NewWallpaper) -> Result<(), StoreError>;

    /// Rows of `region` by date descending, `limit` rows after skipping `offset`.
    async fn list_region(
        &self,
        region: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WallpaperSummary>, StoreError>;

    async fn find_by_date(
        &self,
        region: &str,
        date: i32,
    ) -> Result<Option<WallpaperSummary>, StoreError>;

    /// All rows published on `date`, as (region, row) pairs.
    async fn list_by_date(&self, date: i32)
        -> Result<Vec<(String, WallpaperSummary)>, StoreError>;
}

#[derive(Clone)]
pub struct PgWallpaperStore {
    pool: PgPool,
}

impl PgWallpaperStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            query(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl WallpaperStore for PgWallpaperStore {
    async fn upsert(&self, wallpaper: NewWallpaper) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            upsert_wallpaper(conn, &wallpaper)?;
            Ok(())
        })
        .await
    }

    async fn list_region(
        &self,
        region: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WallpaperSummary>, StoreError> {
        let region = region.to_string();
        self.with_conn(move |conn| Ok(list_region_wallpapers(conn, &region, limit, offset)?))
            .await
    }

    async fn find_by_date(
        &self,
        region: &str,
        date: i32,
    ) -> Result<Option<WallpaperSummary>, StoreError> {
        let region = region.to_string();
        self.with_conn(move |conn| Ok(get_wallpaper_by_date(conn, &region, date)?))
            .await
    }

    async fn list_by_date(
        &self,
        date: i32,
    ) -> Result<Vec<(String, WallpaperSummary)>, StoreError> {
        self.with_conn(move |conn| Ok(list_wallpapers_by_date(conn, date)?))
            .await
    }
}
