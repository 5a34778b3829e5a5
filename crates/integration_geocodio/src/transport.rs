//! HTTP transport
//!
//! The only seam between the client and network I/O. [`GeocodioClient`]
//! is generic over [`HttpTransport`] so a different HTTP stack, or a test
//! double, can be injected.
//!
//! [`GeocodioClient`]: crate::GeocodioClient

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::ext::ReasonPhrase;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::GeocodioError;

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status code
    pub reason: String,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Create a new raw response
    #[must_use]
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }
}

/// Transport able to issue the two request shapes the client needs
///
/// Implementations resolve only once the whole body has been read, and
/// report network-level failures as [`GeocodioError::Transport`].
#[allow(clippy::struct_field_names)] // automock generates struct with prefixes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request with the given query parameters
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse, GeocodioError>;

    /// Issue a POST request with the given headers and body
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Bytes,
    ) -> Result<RawResponse, GeocodioError>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, GeocodioError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodioError::Configuration(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<RawResponse, GeocodioError> {
        let status = response.status();
        // hyper only records the phrase when it differs from the canonical one
        let reason = match response.extensions().get::<ReasonPhrase>() {
            Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            None => status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), ToString::to_string),
        };
        debug!(status = %status, "Received Geocodio response");

        let body = response.bytes().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, query), fields(params = query.len()))]
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawResponse, GeocodioError> {
        let response = self.client.get(url).query(query).send().await?;
        Self::read(response).await
    }

    // The URL carries the API key, so it stays out of the span
    #[instrument(skip(self, url, headers, body), fields(body_len = body.len()))]
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Bytes,
    ) -> Result<RawResponse, GeocodioError> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        Self::read(response).await
    }
}
