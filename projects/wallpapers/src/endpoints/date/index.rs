use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use utoipa::ToSchema;
use tracing::error;

use crate::dates::{parse_yyyymmdd, today, ParseDateError};
use crate::db::{store::StoreError, wallpaper::models::WallpaperSummary};
use crate::endpoints::{
    envelope::{failure, FailureBody, FailureKind, Success},
    AppState,
};
use crate::regions::RegionRegistry;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },
    #[error(transparent)]
    InvalidDate {
        #[from]
        source: ParseDateError,
    },
    #[error("ListWallpapersByDate: {source}")]
    ListWallpapersByDate {
        #[from]
        source: StoreError,
    },
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        HandlerError::InvalidQuery { message: rejection.body_text() }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidQuery { .. } | HandlerError::InvalidDate { .. } => {
                failure(FailureKind::Validation, self.to_string())
            }
            HandlerError::ListWallpapersByDate { source } => {
                error!(error = %source, "listing wallpapers by date failed");
                failure(FailureKind::Internal, "storage error")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

/// Region → record-or-null, serialized as a JSON object in registry order.
#[derive(Debug)]
pub struct RegionWallpapers(pub Vec<(String, Option<WallpaperSummary>)>);

impl RegionWallpapers {
    /// One entry per registered region; the first row seen for a region wins.
    pub fn collect(regions: &RegionRegistry, rows: Vec<(String, WallpaperSummary)>) -> Self {
        let mut entries: Vec<(String, Option<WallpaperSummary>)> =
            regions.codes().iter().map(|code| (code.clone(), None)).collect();
        for (region, row) in rows {
            if let Some((_, slot)) = entries.iter_mut().find(|(code, _)| *code == region) {
                if slot.is_none() {
                    *slot = Some(row);
                }
            }
        }
        Self(entries)
    }
}

impl Serialize for RegionWallpapers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(region, row)| (region, row)))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DateWallpapers {
    pub date: i32,
    /// Region code to wallpaper, `null` where nothing was stored that day.
    #[schema(value_type = Object)]
    pub data: RegionWallpapers,
}

/// Axum handler: GET /date?date=YYYYMMDD
#[utoipa::path(
    get,
    path = "/date",
    tag = "dates",
    operation_id = "listWallpapersByDate",
    params(
        ("date" = Option<String>, Query, description = "Day as `YYYYMMDD`, default today")
    ),
    responses(
        (status = 200, description = "One entry per served region", body = DateWallpapers),
        (status = 500, description = "Bad date or storage failure", body = FailureBody)
    )
)]
pub async fn handler(
    Extension(state): Extension<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Success<DateWallpapers>, HandlerError> {
    let Query(query) = query?;
    let date = match query.date.as_deref() {
        Some(value) => parse_yyyymmdd(value)?,
        None => today(),
    };

    let rows = state.store.list_by_date(date).await?;

    Ok(Success(DateWallpapers {
        date,
        data: RegionWallpapers::collect(&state.regions, rows),
    }))
}
