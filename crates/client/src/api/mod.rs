//! SVGL icon search API client.
//!
//! ### Contract
//!
//! - **Endpoint**: `GET https://api.svgl.app/?search=<percent-encoded term>`
//! - **Response**: JSON array of icons; each `route` is a URL string or a
//!   `{ light, dark }` object.
//! - **Assets**: plain `GET` of the route URLs, returning SVG text.
//!
//! Rate limiting is not done here: the orchestrator gates search calls
//! through [`crate::RateLimiter`] so that all callers share one window.

pub mod error;
pub mod request;
pub mod response;

pub use error::ApiError;
pub use request::SearchRequest;
pub use response::{ApiItem, AssetRoute, Category, RouteUrls, decode_items};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, header};
use svgl_core::{AppConfig, Item};
use url::Url;

/// Default base URL for the search API.
const DEFAULT_BASE_URL: &str = "https://api.svgl.app";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "svgl-mcp/0.1";

/// Remote icon search.
#[async_trait]
pub trait IconApi: Send + Sync {
    /// Search icons matching `term`, in API order.
    async fn search(&self, term: &str) -> Result<Vec<Item>, ApiError>;
}

/// Remote source of raw asset bytes.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch_asset(&self, url: &str) -> Result<Bytes, ApiError>;
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct SvglConfig {
    /// Base URL (default: https://api.svgl.app).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: svgl-mcp/0.x).
    pub user_agent: String,
}

impl Default for SvglConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for SvglConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.api_base_url.clone(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

/// SVGL API client.
#[derive(Debug, Clone)]
pub struct SvglClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SvglClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SvglConfig) -> Result<Self, ApiError> {
        let base_url = parse_http_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http, base_url })
    }

    async fn get_bytes(&self, url: Url, accept: &str) -> Result<Bytes, ApiError> {
        let response = self.http.get(url).header(header::ACCEPT, accept).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        Ok(response.bytes().await?)
    }
}

/// Parse an absolute http(s) URL, as used for the API base and asset routes.
fn parse_http_url(input: &str) -> Result<Url, ApiError> {
    let url = Url::parse(input.trim()).map_err(|e| ApiError::InvalidUrl(format!("{input}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::InvalidUrl(format!("{input}: unsupported scheme {scheme}"))),
    }
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::HttpStatus {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

#[async_trait]
impl IconApi for SvglClient {
    async fn search(&self, term: &str) -> Result<Vec<Item>, ApiError> {
        let req = SearchRequest::new(term);
        req.validate()?;

        let start = Instant::now();
        let url = req.to_url(&self.base_url);
        tracing::debug!("searching SVGL API: query={}", req.search);

        let body = self.get_bytes(url, "application/json").await?;
        let items = decode_items(&body)?;

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), items.len());

        Ok(items)
    }
}

#[async_trait]
impl AssetSource for SvglClient {
    async fn fetch_asset(&self, url: &str) -> Result<Bytes, ApiError> {
        let url = parse_http_url(url)?;
        let start = Instant::now();

        let bytes = self.get_bytes(url.clone(), "image/svg+xml,*/*;q=0.8").await?;

        tracing::debug!("fetched asset {} in {:?} ({} bytes)", url, start.elapsed(), bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> SvglClient {
        SvglClient::new(SvglConfig { base_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = SvglConfig::default();
        assert_eq!(config.base_url, "https://api.svgl.app");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { api_base_url: "http://localhost:9999".into(), timeout_ms: 1500, ..Default::default() };
        let config = SvglConfig::from(&app);
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let result = SvglClient::new(SvglConfig { base_url: "ftp://example.com".into(), ..Default::default() });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));

        let result = SvglClient::new(SvglConfig { base_url: "api.svgl.app".into(), ..Default::default() });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_http_url() {
        let url = parse_http_url(" https://api.svgl.app ").unwrap();
        assert_eq!(url.as_str(), "https://api.svgl.app/");
        assert!(parse_http_url("http://127.0.0.1:8080/library/git.svg").is_ok());
        assert!(matches!(parse_http_url("file:///etc/passwd"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(parse_http_url(""), Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_search_decodes_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("search", "git"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "title": "Git", "category": "Software", "route": "https://svgl.app/git.svg", "url": "https://git-scm.com"},
                {"id": 2, "title": "GitHub", "category": "Software",
                 "route": {"light": "https://svgl.app/gh_light.svg", "dark": "https://svgl.app/gh_dark.svg"},
                 "url": "https://github.com"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let items = client.search("git").await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Git");
        assert_eq!(items[0].dark_asset_url, "https://svgl.app/git.svg");
        assert_eq!(items[1].dark_asset_url, "https://svgl.app/gh_dark.svg");
    }

    #[tokio::test]
    async fn test_search_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.search("git").await;

        match result {
            Err(ApiError::HttpStatus { status, reason }) => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(client.search("git").await, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_term_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(client.search("  ").await, Err(ApiError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_fetch_asset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/library/git.svg"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<svg></svg>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let bytes = client
            .fetch_asset(&format!("{}/library/git.svg", server.uri()))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<svg></svg>");

        let missing = client.fetch_asset(&format!("{}/library/nope.svg", server.uri())).await;
        assert!(matches!(missing, Err(ApiError::HttpStatus { status: 404, .. })));
    }
}
