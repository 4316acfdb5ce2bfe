use axum::{extract::Extension, response::IntoResponse};

use crate::endpoints::{envelope::Success, AppState};

/// Axum handler: GET /regions
#[utoipa::path(
    get,
    path = "/regions",
    tag = "regions",
    operation_id = "listRegions",
    responses(
        (status = 200, description = "Served region codes in registry order", body = [String])
    )
)]
pub async fn handler(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Success(state.regions.codes().to_vec())
}
