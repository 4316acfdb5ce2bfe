//! In-process [`WallpaperStore`] with the same ordering rules as the PostgreSQL queries.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::{
    store::{StoreError, WallpaperStore},
    wallpaper::models::{NewWallpaper, Wallpaper, WallpaperSummary},
};

#[derive(Default)]
pub struct MemoryWallpaperStore {
    rows: RwLock<BTreeMap<(String, String), Wallpaper>>,
}

impl MemoryWallpaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, ordered by (region, hash).
    pub async fn rows(&self) -> Vec<Wallpaper> {
        self.rows.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl WallpaperStore for MemoryWallpaperStore {
    async fn upsert(&self, wallpaper: NewWallpaper) -> Result<(), StoreError> {
        let key = (wallpaper.region.clone(), wallpaper.hash.clone());
        self.rows.write().await.insert(key, wallpaper.into());
        Ok(())
    }

    async fn list_region(
        &self,
        region: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WallpaperSummary>, StoreError> {
        let rows = self.rows.read().await;
        let mut matching: Vec<&Wallpaper> =
            rows.values().filter(|row| row.region == region).collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.hash.cmp(&b.hash)));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(WallpaperSummary::from)
            .collect())
    }

    async fn find_by_date(
        &self,
        region: &str,
        date: i32,
    ) -> Result<Option<WallpaperSummary>, StoreError> {
        // BTreeMap order is (region, hash), so the first hit has the smallest hash.
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|row| row.region == region && row.date == date)
            .map(WallpaperSummary::from))
    }

    async fn list_by_date(
        &self,
        date: i32,
    ) -> Result<Vec<(String, WallpaperSummary)>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.date == date)
            .map(|row| (row.region.clone(), WallpaperSummary::from(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallpaper(region: &str, hash: &str, date: i32) -> NewWallpaper {
        NewWallpaper {
            region: region.to_string(),
            hash: format!("{hash:0>32}"),
            date,
            url: format!("https://www.bing.com/th?id={hash}"),
            urlbase: format!("/th?id={hash}"),
            title: format!("title {hash}"),
            description: String::new(),
            copyright: "(c)".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let store = MemoryWallpaperStore::new();
        store.upsert(wallpaper("zh-cn", "a", 20230101)).await.unwrap();
        let once = store.rows().await;
        store.upsert(wallpaper("zh-cn", "a", 20230101)).await.unwrap();
        assert_eq!(store.rows().await, once);
        assert_eq!(once.len(), 1);
    }

    #[tokio::test]
    async fn upsert_overwrites_non_key_fields() {
        let store = MemoryWallpaperStore::new();
        store.upsert(wallpaper("zh-cn", "a", 20230101)).await.unwrap();
        let mut changed = wallpaper("zh-cn", "a", 20230101);
        changed.title = "renamed".to_string();
        store.upsert(changed).await.unwrap();

        let rows = store.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "renamed");
    }

    #[tokio::test]
    async fn same_hash_in_two_regions_is_two_rows() {
        let store = MemoryWallpaperStore::new();
        store.upsert(wallpaper("zh-cn", "a", 20230101)).await.unwrap();
        store.upsert(wallpaper("en-us", "a", 20230101)).await.unwrap();
        assert_eq!(store.rows().await.len(), 2);
    }

    #[tokio::test]
    async fn pagination_matches_expected_counts() {
        let store = MemoryWallpaperStore::new();
        for day in 1..=7 {
            store
                .upsert(wallpaper("en-us", &day.to_string(), 20230100 + day))
                .await
                .unwrap();
        }

        for size in 1..=9i64 {
            for page in 1..=9i64 {
                let got = store.list_region("en-us", size, (page - 1) * size).await.unwrap();
                let expected = size.min(7 - (page - 1) * size).max(0);
                assert_eq!(got.len() as i64, expected, "page {page} size {size}");
            }
        }

        let first = store.list_region("en-us", 3, 0).await.unwrap();
        let dates: Vec<i32> = first.iter().map(|row| row.date).collect();
        assert_eq!(dates, vec![20230107, 20230106, 20230105]);
    }

    #[tokio::test]
    async fn lookups_are_scoped_by_region_and_date() {
        let store = MemoryWallpaperStore::new();
        store.upsert(wallpaper("zh-cn", "a", 20230101)).await.unwrap();
        store.upsert(wallpaper("en-us", "b", 20230101)).await.unwrap();
        store.upsert(wallpaper("en-us", "c", 20230102)).await.unwrap();

        let hit = store.find_by_date("zh-cn", 20230101).await.unwrap().unwrap();
        assert_eq!(hit.hash, format!("{:0>32}", "a"));
        assert!(store.find_by_date("zh-cn", 20230102).await.unwrap().is_none());

        let by_date = store.list_by_date(20230101).await.unwrap();
        let regions: Vec<&str> = by_date.iter().map(|(region, _)| region.as_str()).collect();
        assert_eq!(regions, vec!["en-us", "zh-cn"]);
    }
}
