use std::sync::Arc;

use interfaces_bing_image_archive::index::ImageArchiveClient;
use thiserror::Error;
use tracing::{error, info};

use crate::crawler::fetch::{fetch_region, FetchRegionError};
use crate::db::store::{StoreError, WallpaperStore};
use crate::regions::RegionRegistry;

#[derive(Debug, Error)]
pub enum SyncRegionError {
    #[error("FetchRegion: {source}")]
    FetchRegion {
        #[from]
        source: FetchRegionError,
    },
    #[error("UpsertWallpaper: {source}")]
    UpsertWallpaper {
        #[from]
        source: StoreError,
    },
    #[error("SyncTask: {source}")]
    SyncTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// What a successful sync wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedWallpaper {
    pub hash: String,
    pub date: i32,
}

pub async fn sync_region(
    store: &dyn WallpaperStore,
    client: &ImageArchiveClient,
    regions: &RegionRegistry,
    region: &str,
) -> Result<SyncedWallpaper, SyncRegionError> {
    let wallpaper = fetch_region(client, regions, region).await?;
    let synced = SyncedWallpaper {
        hash: wallpaper.hash.clone(),
        date: wallpaper.date,
    };
    store.upsert(wallpaper).await?;
    Ok(synced)
}

/// Per-region outcomes, in the order the regions were requested.
#[derive(Debug)]
pub struct SyncReport {
    pub outcomes: Vec<(String, Result<SyncedWallpaper, SyncRegionError>)>,
}

impl SyncReport {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }
}

/// Runs one task per region. A failing region is logged and reported, never
/// propagated to the others.
pub async fn sync_regions(
    store: Arc<dyn WallpaperStore>,
    client: ImageArchiveClient,
    regions: RegionRegistry,
    targets: &[String],
) -> SyncReport {
    let handles: Vec<_> = targets
        .iter()
        .map(|region| {
            let store = Arc::clone(&store);
            let client = client.clone();
            let regions = regions.clone();
            let target = region.clone();
            let task = tokio::spawn(async move {
                sync_region(store.as_ref(), &client, &regions, &target).await
            });
            (region.clone(), task)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (region, task) in handles {
        let outcome = task.await.unwrap_or_else(|source| Err(source.into()));
        match &outcome {
            Ok(synced) => info!(%region, hash = %synced.hash, date = synced.date, "wallpaper synced"),
            Err(err) => error!(%region, error = %err, "wallpaper sync failed"),
        }
        outcomes.push((region, outcome));
    }

    SyncReport { outcomes }
}
