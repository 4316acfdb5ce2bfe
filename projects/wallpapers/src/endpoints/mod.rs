pub mod envelope;
pub mod root;
pub mod regions;
pub mod region;
pub mod date;
pub mod doc;

use std::sync::Arc;

use axum::{middleware::map_response_with_state, routing::get, Extension, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::db::store::WallpaperStore;
use crate::regions::RegionRegistry;
use doc::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use envelope::{
    apply_error_status, method_not_allowed, panic_response, route_not_found, ErrorStatusPolicy,
};

/// Handles shared by every handler, built once in `main` and passed down.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WallpaperStore>,
    pub regions: RegionRegistry,
}

impl AppState {
    pub fn new(store: Arc<dyn WallpaperStore>, regions: RegionRegistry) -> Self {
        Self { store, regions }
    }
}

pub fn router(state: AppState, policy: ErrorStatusPolicy) -> Router {
    Router::new()
        .route("/", get(root::index::handler))
        .route("/regions", get(regions::index::handler))
        .route("/region/{region}", get(region::list::index::handler))
        .route("/region/{region}/{date}", get(region::by_date::index::handler))
        .route("/date", get(date::index::handler))
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(map_response_with_state(policy, apply_error_status))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
