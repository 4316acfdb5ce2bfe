use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::endpoints::envelope::Success;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub repo: String,
}

/// Axum handler: GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    operation_id = "serviceInfo",
    responses(
        (status = 200, description = "Service name, version and source repository", body = ServiceInfo)
    )
)]
pub async fn handler() -> impl IntoResponse {
    Success(ServiceInfo {
        message: "Bing Wallpapers API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        repo: env!("CARGO_PKG_REPOSITORY").to_string(),
    })
}
