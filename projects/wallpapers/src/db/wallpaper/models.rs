use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use crate::db::schema::wallpapers;

/// Full stored row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = wallpapers)]
pub struct Wallpaper {
    pub region: String,
    pub hash: String,
    pub date: i32,
    pub url: String,
    pub urlbase: String,
    pub title: String,
    pub description: String,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = wallpapers)]
pub struct NewWallpaper {
    pub region: String,
    pub hash: String,
    pub date: i32,
    pub url: String,
    pub urlbase: String,
    pub title: String,
    pub description: String,
    pub copyright: String,
}

/// Public projection served by the read endpoints. `description` is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = wallpapers)]
pub struct WallpaperSummary {
    #[serde(rename = "hsh")]
    pub hash: String,
    pub date: i32,
    pub url: String,
    pub urlbase: String,
    pub title: String,
    pub copyright: String,
}

impl From<&Wallpaper> for WallpaperSummary {
    fn from(row: &Wallpaper) -> Self {
        Self {
            hash: row.hash.clone(),
            date: row.date,
            url: row.url.clone(),
            urlbase: row.urlbase.clone(),
            title: row.title.clone(),
            copyright: row.copyright.clone(),
        }
    }
}

impl From<NewWallpaper> for Wallpaper {
    fn from(new: NewWallpaper) -> Self {
        Self {
            region: new.region,
            hash: new.hash,
            date: new.date,
            url: new.url,
            urlbase: new.urlbase,
            title: new.title,
            description: new.description,
            copyright: new.copyright,
        }
    }
}
