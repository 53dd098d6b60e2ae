//! HTTP JSON transport
//!
//! The resolver only needs "give me the JSON at this URL". `HttpJsonFetcher`
//! is that seam; `ReqwestFetcher` is the real implementation and tests
//! substitute stubs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("cityforecast/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while talking to an upstream API
///
/// `Clone` so that a single failed resolution can be reported to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection or protocol failure
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The JSON did not have the expected shape
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An endpoint URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The resolution task ended without producing a result
    #[error("lookup aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_decode() {
            FetchError::InvalidJson(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Resolves a URL to parsed JSON
#[async_trait]
pub trait HttpJsonFetcher: Send + Sync {
    /// Performs a GET and parses the body as JSON
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError>;
}

/// reqwest-backed fetcher with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpJsonFetcher for ReqwestFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "upstream returned error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::InvalidJson(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port and returns its URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        Url::parse(&format!("http://{}/v1/search", addr)).unwrap()
    }

    #[test]
    fn test_reqwest_fetcher_builds_with_timeout() {
        assert!(ReqwestFetcher::new(DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(FetchError::Status(503).to_string(), "HTTP status 503");
        assert_eq!(
            FetchError::InvalidData("missing daily".to_string()).to_string(),
            "invalid data: missing daily"
        );
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("cityforecast/"));
    }

    #[tokio::test]
    async fn test_success_status_parses_json() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"results": []}"#).await;
        let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
        let body = fetcher.fetch_json(&url).await.unwrap();
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_mapped() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch_json(&url).await.unwrap_err();
        assert_eq!(err, FetchError::Status(503));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_json() {
        let url = serve_once("HTTP/1.1 200 OK", "<html>maintenance</html>").await;
        let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch_json(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidJson(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 on localhost is discard; nothing listens there in CI.
        let fetcher = ReqwestFetcher::new(Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/v1/search").unwrap();
        let err = fetcher.fetch_json(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout));
    }
}
