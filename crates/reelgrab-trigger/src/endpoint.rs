//! Download endpoint: the backend that turns a page URL into video bytes

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::TriggerError;
use crate::Result;

/// JSON body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Fully-read endpoint response
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl EndpointResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Backend accepting a video URL and answering with its bytes
///
/// Non-2xx answers are returned as responses, not errors; `Err` is reserved
/// for transport failures (refused connection, timeout, broken body).
#[async_trait]
pub trait DownloadEndpoint: Send + Sync {
    async fn post_download(&self, request: &DownloadRequest) -> Result<EndpointResponse>;
}

/// `reqwest`-backed endpoint
#[derive(Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(base: &str, path: &str, timeout: Duration) -> Result<Self> {
        let url = endpoint_url(base, path)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("reelgrab/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Append `path` under the base URL's own path instead of replacing it
fn endpoint_url(base: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base)
        .map_err(|e| TriggerError::InvalidEndpoint(format!("{}: {}", base, e)))?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    base.join(path.trim_start_matches('/'))
        .map_err(|e| TriggerError::InvalidEndpoint(format!("{}: {}", path, e)))
}

#[async_trait]
impl DownloadEndpoint for HttpEndpoint {
    async fn post_download(&self, request: &DownloadRequest) -> Result<EndpointResponse> {
        tracing::debug!(endpoint = %self.url, url = %request.url, "Posting download request");

        // `.json` sets `Content-Type: application/json`
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?;

        Ok(EndpointResponse {
            status,
            content_type,
            body,
        })
    }
}
