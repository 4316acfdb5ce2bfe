use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use crate::db::{store::StoreError, wallpaper::models::WallpaperSummary};
use crate::endpoints::{
    envelope::{failure, FailureBody, FailureKind, Success},
    AppState,
};
use crate::pagination::{Page, PageRequest, PageRequestError};
use crate::regions::UnknownRegionError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid path: {message}")]
    InvalidPath { message: String },
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },
    #[error(transparent)]
    InvalidPage {
        #[from]
        source: PageRequestError,
    },
    #[error(transparent)]
    UnknownRegion {
        #[from]
        source: UnknownRegionError,
    },
    #[error("ListRegion: {source}")]
    ListRegion {
        #[from]
        source: StoreError,
    },
}

impl From<PathRejection> for HandlerError {
    fn from(rejection: PathRejection) -> Self {
        HandlerError::InvalidPath { message: rejection.body_text() }
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        HandlerError::InvalidQuery { message: rejection.body_text() }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidPath { .. }
            | HandlerError::InvalidQuery { .. }
            | HandlerError::InvalidPage { .. }
            | HandlerError::UnknownRegion { .. } => failure(FailureKind::Validation, self.to_string()),
            HandlerError::ListRegion { source } => {
                error!(error = %source, "listing region wallpapers failed");
                failure(FailureKind::Internal, "storage error")
            }
        }
    }
}

/// Query parameters: `pn` page number, `ps` page size.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pn: Option<i64>,
    ps: Option<i64>,
}

/// Axum handler: GET /region/{region}?pn=&ps=
#[utoipa::path(
    get,
    path = "/region/{region}",
    tag = "regions",
    operation_id = "listRegionWallpapers",
    params(
        ("region" = String, Path, description = "Region code, e.g. `zh-cn`"),
        ("pn" = Option<i64>, Query, description = "Page number, default 1"),
        ("ps" = Option<i64>, Query, description = "Page size 1-9, default 8")
    ),
    responses(
        (status = 200, description = "Newest wallpapers first", body = Page<WallpaperSummary>),
        (status = 500, description = "Unknown region, bad paging or storage failure", body = FailureBody)
    )
)]
pub async fn handler(
    Extension(state): Extension<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Success<Page<WallpaperSummary>>, HandlerError> {
    let Path(region) = path?;
    let Query(query) = query?;
    let page = PageRequest::new(query.pn, query.ps)?;
    let region = state.regions.validate(&region)?;

    let rows = state
        .store
        .list_region(region, page.limit(), page.offset())
        .await?;

    Ok(Success(Page::new(page, rows)))
}
