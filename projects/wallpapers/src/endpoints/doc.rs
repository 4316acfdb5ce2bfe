//! OpenAPI description of the read API, served as JSON at
//! `/api-docs/openapi.json` and browsable through Swagger UI at `/docs`.
//!
//! Success bodies are documented by their `data` payload; every one of them
//! travels inside `{"status": "success", "data": ...}`.

use utoipa::OpenApi;

use crate::db::wallpaper::models::WallpaperSummary;
use crate::endpoints::{date::index::DateWallpapers, envelope::FailureBody, root::index::ServiceInfo};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bing Wallpapers API",
        description = "Daily Bing wallpapers per region, crawled from the public image archive."
    ),
    paths(
        crate::endpoints::root::index::handler,
        crate::endpoints::regions::index::handler,
        crate::endpoints::region::list::index::handler,
        crate::endpoints::region::by_date::index::handler,
        crate::endpoints::date::index::handler,
    ),
    components(schemas(ServiceInfo, WallpaperSummary, DateWallpapers, FailureBody)),
    tags(
        (name = "meta", description = "Service metadata"),
        (name = "regions", description = "Served regions and their wallpapers"),
        (name = "dates", description = "Wallpapers of one day across regions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_read_endpoint() {
        let doc = ApiDoc::openapi();
        let mut paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            ["/", "/date", "/region/{region}", "/region/{region}/{date}", "/regions"]
        );
    }

    #[test]
    fn summary_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let properties = &json["components"]["schemas"]["WallpaperSummary"]["properties"];
        assert!(properties.get("hsh").is_some());
        assert!(properties.get("hash").is_none());
        assert!(properties.get("description").is_none());
    }
}
