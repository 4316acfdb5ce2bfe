use diesel::prelude::*;
use diesel::upsert::excluded;
use thiserror::Error;
use crate::db::{wallpaper::models::*, schema::wallpapers::dsl::*};

#[derive(Debug, Error)]
pub enum UpsertWallpaperError {
    #[error("UpsertWallpaper: {source}")]
    UpsertWallpaper{
        #[from]
        source: diesel::result::Error
    },
}

/// Inserts the row, or overwrites every non-key column when (region, hash) exists.
pub fn upsert_wallpaper(
    conn: &mut PgConnection,
    new: &NewWallpaper
) -> Result<usize, UpsertWallpaperError> {
    diesel::insert_into(wallpapers)
        .values(new)
        .on_conflict((region, hash))
        .do_update()
        .set((
            date.eq(excluded(date)),
            url.eq(excluded(url)),
            urlbase.eq(excluded(urlbase)),
            title.eq(excluded(title)),
            description.eq(excluded(description)),
            copyright.eq(excluded(copyright)),
        ))
        .execute(conn)
        .map_err(|source| UpsertWallpaperError::UpsertWallpaper{ source })
}

#[derive(Debug, Error)]
pub enum ListRegionWallpapersError {
    #[error("ListRegionWallpapers: {source}")]
    ListRegionWallpapers{
        #[from]
        source: diesel::result::Error
    },
}

pub fn list_region_wallpapers(
    conn: &mut PgConnection,
    region_val: &str,
    limit_val: i64,
    offset_val: i64
) -> Result<Vec<WallpaperSummary>, ListRegionWallpapersError> {
    wallpapers
        .filter(region.eq(region_val))
        .order((date.desc(), hash.asc()))
        .limit(limit_val)
        .offset(offset_val)
        .select(WallpaperSummary::as_select())
        .load(conn)
        .map_err(|source| ListRegionWallpapersError::ListRegionWallpapers{ source })
}

#[derive(Debug, Error)]
pub enum GetWallpaperByDateError {
    #[error("GetWallpaperByDate: {source}")]
    GetWallpaperByDate{
        #[from]
        source: diesel::result::Error
    },
}

pub fn get_wallpaper_by_date(
    conn: &mut PgConnection,
    region_val: &str,
    date_val: i32
) -> Result<Option<WallpaperSummary>, GetWallpaperByDateError> {
    wallpapers
        .filter(region.eq(region_val))
        .filter(date.eq(date_val))
        .order(hash.asc())
        .select(WallpaperSummary::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetWallpaperByDateError::GetWallpaperByDate{ source })
}

#[derive(Debug, Error)]
pub enum ListWallpapersByDateError {
    #[error("ListWallpapersByDate: {source}")]
    ListWallpapersByDate{
        #[from]
        source: diesel::result::Error
    },
}

/// Every row of `date_val` across regions, ordered so the first row per region wins.
pub fn list_wallpapers_by_date(
    conn: &mut PgConnection,
    date_val: i32
) -> Result<Vec<(String, WallpaperSummary)>, ListWallpapersByDateError> {
    wallpapers
        .filter(date.eq(date_val))
        .order((region.asc(), hash.asc()))
        .select((region, WallpaperSummary::as_select()))
        .load(conn)
        .map_err(|source| ListWallpapersByDateError::ListWallpapersByDate{ source })
}
