use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use interfaces_bing_image_archive::index::{ImageArchiveClient, DEFAULT_TIMEOUT};
use projects_wallpapers::{
    crawler::{
        fetch::{fetch_region, FetchRegionError},
        sync::{sync_region, sync_regions, SyncRegionError},
    },
    db::memory::MemoryWallpaperStore,
    regions::RegionRegistry,
};
use serde_json::json;

fn market_hash(market: &str) -> String {
    format!("{:0>32}", market.replace('-', ""))
}

/// Stands in for the upstream archive: `de-de` is down, `fr-fr` has no images,
/// `es-es` answers garbage, everything else gets one image.
async fn archive(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let market = params.get("mkt").cloned().unwrap_or_default();
    match market.as_str() {
        "de-de" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        "fr-fr" => Json(json!({"images": []})).into_response(),
        "es-es" => "<html>not json</html>".into_response(),
        _ => Json(json!({
            "images": [{
                "startdate": "20230101",
                "enddate": "20230102",
                "url": format!("/th?id=OHR.{market}_1920x1080.jpg"),
                "urlbase": format!("/th?id=OHR.{market}"),
                "copyright": format!("© {market}"),
                "title": format!("Title {market}"),
                "desc": "dropped before storage",
                "hsh": market_hash(&market),
            }]
        }))
        .into_response(),
    }
}

async fn spawn_archive() -> String {
    let app = Router::new().route("/HPImageArchive.aspx", get(archive));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client() -> ImageArchiveClient {
    ImageArchiveClient::new(&spawn_archive().await, DEFAULT_TIMEOUT).unwrap()
}

#[tokio::test]
async fn fetches_and_maps_current_image() {
    let client = client().await;
    let row = fetch_region(&client, &RegionRegistry::default(), "zh-cn").await.unwrap();

    assert_eq!(row.region, "zh-cn");
    assert_eq!(row.hash, market_hash("zh-cn"));
    assert_eq!(row.date, 20230102);
    assert_eq!(row.url, format!("{}/th?id=OHR.zh-cn_1920x1080.jpg", client.base_url()));
    assert_eq!(row.description, "");
}

#[tokio::test]
async fn upstream_problems_are_fetch_errors() {
    let client = client().await;
    let regions = RegionRegistry::default();

    assert!(matches!(
        fetch_region(&client, &regions, "de-de").await,
        Err(FetchRegionError::UnexpectedStatus { .. })
    ));
    assert!(matches!(
        fetch_region(&client, &regions, "fr-fr").await,
        Err(FetchRegionError::NoImages)
    ));
    assert!(matches!(
        fetch_region(&client, &regions, "es-es").await,
        Err(FetchRegionError::DeserializeResponseBody { .. })
    ));
    assert!(matches!(
        fetch_region(&client, &regions, "xx-xx").await,
        Err(FetchRegionError::UnknownRegion { .. })
    ));
}

#[tokio::test]
async fn unreachable_upstream_is_a_fetch_error() {
    // Port 9 (discard) is not expected to accept HTTP on loopback.
    let client = ImageArchiveClient::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
    assert!(matches!(
        fetch_region(&client, &RegionRegistry::default(), "en-us").await,
        Err(FetchRegionError::FetchImageArchive { .. })
    ));
}

#[tokio::test]
async fn syncing_twice_leaves_storage_unchanged() {
    let client = client().await;
    let regions = RegionRegistry::default();
    let store = MemoryWallpaperStore::new();

    sync_region(&store, &client, &regions, "en-us").await.unwrap();
    let once = store.rows().await;
    sync_region(&store, &client, &regions, "en-us").await.unwrap();

    assert_eq!(store.rows().await, once);
    assert_eq!(once.len(), 1);
}

#[tokio::test]
async fn failing_regions_do_not_block_the_others() {
    let client = client().await;
    let regions = RegionRegistry::default();
    let store = Arc::new(MemoryWallpaperStore::new());

    let report = sync_regions(store.clone(), client, regions.clone(), regions.codes()).await;

    assert_eq!(report.outcomes.len(), 12);
    assert_eq!(report.failed(), 3);
    assert_eq!(report.succeeded(), 9);

    let order: Vec<&str> = report.outcomes.iter().map(|(region, _)| region.as_str()).collect();
    let expected: Vec<&str> = regions.codes().iter().map(String::as_str).collect();
    assert_eq!(order, expected);

    for (region, outcome) in &report.outcomes {
        match region.as_str() {
            "de-de" | "fr-fr" | "es-es" => {
                assert!(matches!(outcome, Err(SyncRegionError::FetchRegion { .. })), "{region}")
            }
            _ => assert_eq!(outcome.as_ref().unwrap().hash, market_hash(region)),
        }
    }

    let rows = store.rows().await;
    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|row| row.description.is_empty()));
}
