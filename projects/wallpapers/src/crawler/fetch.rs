use interfaces_bing_image_archive::index::{
    ArchiveImage, FetchImageArchiveError, ImageArchiveClient, ImageArchiveResponse, StatusCode,
};
use thiserror::Error;

use crate::dates::{parse_yyyymmdd, ParseDateError};
use crate::db::wallpaper::models::NewWallpaper;
use crate::regions::{RegionRegistry, UnknownRegionError};

pub const HASH_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum FetchRegionError {
    #[error(transparent)]
    UnknownRegion {
        #[from]
        source: UnknownRegionError,
    },

    #[error("FetchImageArchive: {source}")]
    FetchImageArchive {
        #[from]
        source: FetchImageArchiveError,
    },

    #[error("UnexpectedStatus: upstream answered {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("NoImages: upstream returned an empty image list")]
    NoImages,

    #[error("InvalidHash: expected 32 characters, got `{hash}`")]
    InvalidHash { hash: String },

    #[error("InvalidEndDate: {source}")]
    InvalidEndDate {
        #[from]
        source: ParseDateError,
    },
}

/// Current wallpaper of `region`, ready to upsert. Nothing is written here.
pub async fn fetch_region(
    client: &ImageArchiveClient,
    regions: &RegionRegistry,
    region: &str,
) -> Result<NewWallpaper, FetchRegionError> {
    let region = regions.validate(region)?;
    let result = client.fetch_current_image(region).await?;

    if !result.status.is_success() {
        return Err(FetchRegionError::UnexpectedStatus { status: result.status });
    }

    let parsed: ImageArchiveResponse = serde_json::from_str(&result.body)?;
    let image = parsed
        .images
        .into_iter()
        .next()
        .ok_or(FetchRegionError::NoImages)?;

    wallpaper_from_archive(region, client.base_url(), image)
}

/// Maps an archive entry onto a row. The upstream description is dropped on purpose.
pub fn wallpaper_from_archive(
    region: &str,
    base_url: &str,
    image: ArchiveImage,
) -> Result<NewWallpaper, FetchRegionError> {
    if image.hsh.chars().count() != HASH_LEN {
        return Err(FetchRegionError::InvalidHash { hash: image.hsh });
    }
    let date = parse_yyyymmdd(&image.enddate)?;

    Ok(NewWallpaper {
        region: region.to_string(),
        hash: image.hsh,
        date,
        url: format!("{base_url}{}", image.url),
        urlbase: image.urlbase,
        title: image.title,
        description: String::new(),
        copyright: image.copyright,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ArchiveImage {
        ArchiveImage {
            hsh: "0123456789abcdef0123456789abcdef".to_string(),
            enddate: "20230102".to_string(),
            url: "/th?id=OHR.Sample_1920x1080.jpg".to_string(),
            urlbase: "/th?id=OHR.Sample".to_string(),
            title: "Sample".to_string(),
            desc: Some("a very long description".to_string()),
            copyright: "© Someone".to_string(),
        }
    }

    #[test]
    fn maps_archive_entry_to_row() {
        let row = wallpaper_from_archive("zh-cn", "https://www.bing.com", image()).unwrap();
        assert_eq!(row.region, "zh-cn");
        assert_eq!(row.date, 20230102);
        assert_eq!(row.url, "https://www.bing.com/th?id=OHR.Sample_1920x1080.jpg");
        assert_eq!(row.urlbase, "/th?id=OHR.Sample");
        assert_eq!(row.description, "");
    }

    #[test]
    fn rejects_short_hash() {
        let mut bad = image();
        bad.hsh = "abc".to_string();
        assert!(matches!(
            wallpaper_from_archive("zh-cn", "https://www.bing.com", bad),
            Err(FetchRegionError::InvalidHash { .. })
        ));
    }

    #[test]
    fn rejects_bad_end_date() {
        let mut bad = image();
        bad.enddate = "20231340".to_string();
        assert!(matches!(
            wallpaper_from_archive("zh-cn", "https://www.bing.com", bad),
            Err(FetchRegionError::InvalidEndDate { .. })
        ));
    }
}
