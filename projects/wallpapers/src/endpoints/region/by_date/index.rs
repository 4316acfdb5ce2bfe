use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::dates::{parse_yyyymmdd, ParseDateError};
use crate::db::{store::StoreError, wallpaper::models::WallpaperSummary};
use crate::endpoints::{
    envelope::{failure, FailureBody, FailureKind, Success},
    AppState,
};
use crate::regions::UnknownRegionError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid path: {message}")]
    InvalidPath { message: String },
    #[error(transparent)]
    UnknownRegion {
        #[from]
        source: UnknownRegionError,
    },
    #[error(transparent)]
    InvalidDate {
        #[from]
        source: ParseDateError,
    },
    #[error("wallpaper not found for {region} on {date}")]
    WallpaperNotFound { region: String, date: i32 },
    #[error("GetWallpaperByDate: {source}")]
    GetWallpaperByDate {
        #[from]
        source: StoreError,
    },
}

impl From<PathRejection> for HandlerError {
    fn from(rejection: PathRejection) -> Self {
        HandlerError::InvalidPath { message: rejection.body_text() }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidPath { .. }
            | HandlerError::UnknownRegion { .. }
            | HandlerError::InvalidDate { .. } => {
                failure(FailureKind::Validation, self.to_string())
            }
            HandlerError::WallpaperNotFound { .. } => failure(FailureKind::NotFound, self.to_string()),
            HandlerError::GetWallpaperByDate { source } => {
                error!(error = %source, "looking up wallpaper by date failed");
                failure(FailureKind::Internal, "storage error")
            }
        }
    }
}

/// Axum handler: GET /region/{region}/{date}
#[utoipa::path(
    get,
    path = "/region/{region}/{date}",
    tag = "regions",
    operation_id = "getRegionWallpaperByDate",
    params(
        ("region" = String, Path, description = "Region code, e.g. `zh-cn`"),
        ("date" = String, Path, description = "Day as `YYYYMMDD`")
    ),
    responses(
        (status = 200, description = "Wallpaper of that day", body = WallpaperSummary),
        (status = 500, description = "Unknown region, bad date, no wallpaper or storage failure", body = FailureBody)
    )
)]
pub async fn handler(
    Extension(state): Extension<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Success<WallpaperSummary>, HandlerError> {
    let Path((region, date)) = path?;
    let region = state.regions.validate(&region)?;
    let date = parse_yyyymmdd(&date)?;

    state
        .store
        .find_by_date(region, date)
        .await?
        .map(Success)
        .ok_or_else(|| HandlerError::WallpaperNotFound {
            region: region.to_string(),
            date,
        })
}
