//! HTTP transport for image downloads

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;
use crate::target::Credentials;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Failed to read body: {0}")]
    BodyFailed(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Status line and body of a completed GET
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Only read for status 200, empty otherwise
    pub body: Bytes,
}

/// One GET request. The response handle must be released before returning.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, credentials: Option<&Credentials>) -> Result<HttpResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout.as_duration())
            .timeout(config.request_timeout.as_duration())
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10));

        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, credentials: Option<&Credentials>) -> Result<HttpResponse> {
        debug!(url, authenticated = credentials.is_some(), "Starting download");

        let mut request = self.client.get(url);
        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            // response dropped here, connection released
            debug!(url, status, "Download returned non-200 status");
            return Ok(HttpResponse {
                status,
                body: Bytes::new(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::BodyFailed(e.to_string()))?;

        debug!(url, size = body.len(), "Download completed");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_from_defaults() {
        assert!(HttpTransport::new(&FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_request_error() {
        let transport = HttpTransport::new(&FetchConfig::default()).unwrap();
        let result = transport.get("http://", None).await;
        assert!(matches!(result, Err(TransportError::RequestFailed(_))));
    }
}
