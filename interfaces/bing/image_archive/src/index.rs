use std::time::Duration;

use reqwest::Client;
pub use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.bing.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Raw upstream answer; the caller decides what a usable status is.
pub struct ImageArchiveResult {
    pub body: String,
    pub status: StatusCode,
}

/// Top-level shape of the archive JSON. Only `images` matters to us.
#[derive(Debug, Deserialize)]
pub struct ImageArchiveResponse {
    pub images: Vec<ArchiveImage>,
}

/// One entry of `images`. Unknown upstream fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveImage {
    pub hsh: String,
    pub enddate: String,
    pub url: String,
    pub urlbase: String,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    pub copyright: String,
}

#[derive(Debug, Clone)]
pub struct ImageArchiveClient {
    client: Client,
    base_url: String,
}

impl ImageArchiveClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BuildClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("rust-client")
            .build()
            .map_err(|source| BuildClientError::Build { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asks for the single most recent image of `market`.
    pub async fn fetch_current_image(
        &self,
        market: &str,
    ) -> Result<ImageArchiveResult, FetchImageArchiveError> {
        let response = self
            .client
            .get(archive_url(&self.base_url, market))
            .send()
            .await
            .map_err(|source| FetchImageArchiveError::RequestSend { source })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| FetchImageArchiveError::ResponseRead { source })?;

        Ok(ImageArchiveResult { body, status })
    }
}

pub fn archive_url(base_url: &str, market: &str) -> String {
    format!("{base_url}/HPImageArchive.aspx?format=js&idx=0&n=1&mkt={market}")
}

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("Build: {source}")]
    Build { source: reqwest::Error },
}

#[derive(Debug, Error)]
pub enum FetchImageArchiveError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "images": [{
            "startdate": "20230101",
            "fullstartdate": "202301011600",
            "enddate": "20230102",
            "url": "/th?id=OHR.Sample_ZH-CN123_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp",
            "urlbase": "/th?id=OHR.Sample_ZH-CN123",
            "copyright": "Somewhere (© Someone)",
            "copyrightlink": "https://www.bing.com/search?q=x",
            "title": "A title",
            "hsh": "0123456789abcdef0123456789abcdef"
        }],
        "tooltips": {"loading": "..."}
    }"#;

    #[test]
    fn builds_market_url() {
        assert_eq!(
            archive_url(DEFAULT_BASE_URL, "zh-cn"),
            "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=1&mkt=zh-cn"
        );
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = ImageArchiveClient::new("http://127.0.0.1:9/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn deserializes_archive_payload() {
        let parsed: ImageArchiveResponse = serde_json::from_str(SAMPLE).unwrap();
        let image = &parsed.images[0];
        assert_eq!(image.hsh, "0123456789abcdef0123456789abcdef");
        assert_eq!(image.enddate, "20230102");
        assert_eq!(image.urlbase, "/th?id=OHR.Sample_ZH-CN123");
        assert_eq!(image.desc, None);
    }

    #[test]
    fn missing_field_is_an_error() {
        let body = r#"{"images": [{"hsh": "x", "enddate": "20230102"}]}"#;
        assert!(serde_json::from_str::<ImageArchiveResponse>(body).is_err());
    }
}
