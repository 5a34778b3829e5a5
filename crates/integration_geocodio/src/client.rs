//! Geocodio API client
//!
//! Builds and issues the three request shapes the API supports:
//!
//! - single query: `GET {base}/geocode?q=..&api_key=..`
//! - parse: `GET {base}/parse?q=..&api_key=..`
//! - batch: `POST {base}/geocode?api_key=..` with a JSON body
//!
//! Batch payloads go in the body because they can exceed practical URL
//! length limits.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{DEFAULT_BASE_URL, GeocodioConfig};
use crate::envelope::ResultEnvelope;
use crate::error::GeocodioError;
use crate::query::{BatchQuery, Query, Verb};
use crate::status::classify;
use crate::transport::{HttpTransport, RawResponse, ReqwestTransport};

/// Client for the Geocodio API
///
/// Holds the API key and the transport. Apart from the key the client is
/// stateless and can be shared across any number of requests.
pub struct GeocodioClient<T = ReqwestTransport> {
    api_key: Option<String>,
    base_url: String,
    transport: T,
}

impl GeocodioClient<ReqwestTransport> {
    /// Create a client with default settings
    ///
    /// The key may be `None` and set later with [`Self::set_api_key`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(api_key: Option<String>) -> Result<Self, GeocodioError> {
        Self::from_config(&GeocodioConfig {
            api_key,
            ..GeocodioConfig::default()
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn from_config(config: &GeocodioConfig) -> Result<Self, GeocodioError> {
        config.validate().map_err(GeocodioError::Configuration)?;

        let transport = ReqwestTransport::new(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;

        Ok(Self::with_transport(config.api_key.clone(), transport)
            .with_base_url(config.base_url.as_str()))
    }
}

impl<T: HttpTransport> GeocodioClient<T> {
    /// Create a client on top of the given transport
    #[must_use]
    pub fn with_transport(api_key: Option<String>, transport: T) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the API key used by subsequent requests
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// The current API key
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns true if an API key is set
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The API base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Geocode a single address or coordinate pair
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodioError`] for any non-200 response, transport
    /// failure or undecodable body.
    pub async fn geocode(&self, query: impl Into<Query>) -> Result<ResultEnvelope, GeocodioError> {
        self.get(query, Verb::Geocode).await
    }

    /// Parse a free-text address into components without resolving it
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodioError`] for any non-200 response, transport
    /// failure or undecodable body.
    pub async fn parse(&self, query: impl Into<Query>) -> Result<ResultEnvelope, GeocodioError> {
        self.get(query, Verb::Parse).await
    }

    /// Issue a single query against the given endpoint
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodioError`] for any non-200 response, transport
    /// failure or undecodable body.
    #[instrument(skip(self, query))]
    pub async fn get(
        &self,
        query: impl Into<Query>,
        verb: Verb,
    ) -> Result<ResultEnvelope, GeocodioError> {
        let query = query.into();
        let url = self.endpoint(verb);
        let params = vec![
            ("q".to_string(), query.to_query_string()),
            ("api_key".to_string(), self.key_or_empty().to_string()),
        ];

        debug!(url = %url, "Sending Geocodio request");

        let response = self.transport.get(&url, &params).await?;
        Self::read_envelope(response)
    }

    /// Geocode several queries in one request
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodioError`] for any non-200 response, transport
    /// failure or undecodable body.
    #[instrument(skip(self, queries))]
    pub async fn batch_geocode(
        &self,
        queries: impl Into<BatchQuery>,
    ) -> Result<ResultEnvelope, GeocodioError> {
        let queries = queries.into();
        let body = queries
            .to_json()
            .map_err(|e| GeocodioError::Configuration(format!("cannot encode batch: {e}")))?;

        let mut url = Url::parse(&self.endpoint(Verb::Geocode))
            .map_err(|e| GeocodioError::Configuration(format!("invalid base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("api_key", self.key_or_empty());

        let headers = vec![("content-type".to_string(), "application/json".to_string())];

        debug!(
            endpoint = %self.endpoint(Verb::Geocode),
            queries = queries.len(),
            "Sending Geocodio batch request"
        );

        let response = self
            .transport
            .post(url.as_str(), &headers, Bytes::from(body))
            .await?;
        Self::read_envelope(response)
    }

    fn endpoint(&self, verb: Verb) -> String {
        format!("{}/{}", self.base_url, verb.as_str())
    }

    fn key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    fn read_envelope(response: RawResponse) -> Result<ResultEnvelope, GeocodioError> {
        let outcome = classify(response.status, &response.reason);
        if !outcome.is_success() {
            warn!(
                status = response.status,
                reason = %response.reason,
                "Geocodio request failed"
            );
        }
        outcome.into_result()?;

        ResultEnvelope::from_slice(&response.body)
    }
}

impl<T> fmt::Debug for GeocodioClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodioClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::MockHttpTransport;

    const GEOCODE_URL: &str = "http://api.geocod.io/v1/geocode";
    const PARSE_URL: &str = "http://api.geocod.io/v1/parse";

    fn ok_body() -> &'static str {
        r#"{"input":{"formatted_address":"1109 N Highland St, Arlington, VA"},"results":[{"formatted_address":"1109 N Highland St, Arlington, VA 22201","location":{"lat":38.886672,"lng":-77.094735},"accuracy":1,"accuracy_type":"rooftop","source":"Arlington"}]}"#
    }

    fn params(q: &str, key: &str) -> Vec<(String, String)> {
        vec![
            ("q".to_string(), q.to_string()),
            ("api_key".to_string(), key.to_string()),
        ]
    }

    #[tokio::test]
    async fn test_geocode_sends_q_and_api_key() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|url, query| {
                url == GEOCODE_URL
                    && query == params("1109 N Highland St, Arlington VA", "key-1").as_slice()
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "OK", ok_body())));
        transport.expect_post().never();

        let client = GeocodioClient::with_transport(Some("key-1".to_string()), transport);
        let envelope = client
            .geocode("1109 N Highland St, Arlington VA")
            .await
            .unwrap();

        let first = envelope.first().unwrap().unwrap();
        assert_eq!(first.accuracy_type.as_deref(), Some("rooftop"));
    }

    #[tokio::test]
    async fn test_parse_only_changes_verb() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|url, query| url == PARSE_URL && query == params("Arlington VA", "k").as_slice())
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse::new(
                    200,
                    "OK",
                    r#"{"address_components":{"city":"Arlington","state":"VA"},"formatted_address":"Arlington, VA"}"#,
                ))
            });

        let client = GeocodioClient::with_transport(Some("k".to_string()), transport);
        let parsed = client.parse("Arlington VA").await.unwrap().parsed().unwrap();
        assert_eq!(parsed.address_components.city.as_deref(), Some("Arlington"));
    }

    #[tokio::test]
    async fn test_batch_posts_json_with_key_in_url() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_post()
            .withf(|url, headers, body| {
                let body: serde_json::Value = serde_json::from_slice(body).unwrap();
                url == "http://api.geocod.io/v1/geocode?api_key=batch-key"
                    && headers
                        == [("content-type".to_string(), "application/json".to_string())]
                            .as_slice()
                    && body
                        == serde_json::json!({
                            "1": "1109 N Highland St, Arlington VA",
                            "2": "525 University Ave, Toronto, ON, Canada"
                        })
            })
            .times(1)
            .returning(|_, _, _| Ok(RawResponse::new(200, "OK", r#"{"results":{}}"#)));
        transport.expect_get().never();

        let client = GeocodioClient::with_transport(Some("batch-key".to_string()), transport);
        let envelope = client
            .batch_geocode([
                ("1", "1109 N Highland St, Arlington VA"),
                ("2", "525 University Ave, Toronto, ON, Canada"),
            ])
            .await
            .unwrap();

        assert!(envelope.batch().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_api_key_applies_to_later_calls() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|_, query| query == params("a", "old-key").as_slice())
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "OK", ok_body())));
        transport
            .expect_get()
            .withf(|_, query| query == params("b", "new-key").as_slice())
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "OK", ok_body())));

        let mut client = GeocodioClient::with_transport(Some("old-key".to_string()), transport);
        client.geocode("a").await.unwrap();

        client.set_api_key("new-key");
        assert_eq!(client.api_key(), Some("new-key"));
        client.geocode("b").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_is_sent_empty() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|_, query| query == params("a", "").as_slice())
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(403, "Forbidden", "")));

        let client = GeocodioClient::with_transport(None, transport);
        assert!(!client.has_api_key());

        let err = client.geocode("a").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(err.reason(), "Forbidden");
    }

    #[tokio::test]
    async fn test_status_mapping_on_get_and_post() {
        for (status, reason, kind) in [
            (403, "Forbidden", ErrorKind::Auth),
            (422, "Unprocessable Entity", ErrorKind::Data),
            (500, "Internal Server Error", ErrorKind::Server),
            (404, "Not Found", ErrorKind::Unknown),
        ] {
            let mut transport = MockHttpTransport::new();
            transport
                .expect_get()
                .returning(move |_, _| Ok(RawResponse::new(status, reason, "")));
            transport
                .expect_post()
                .returning(move |_, _, _| Ok(RawResponse::new(status, reason, "")));

            let client = GeocodioClient::with_transport(Some("k".to_string()), transport);

            let err = client.geocode("a").await.unwrap_err();
            assert_eq!(err.kind(), kind, "GET {status}");
            assert!(err.reason().contains(reason));

            let err = client.batch_geocode(vec!["a", "b"]).await.unwrap_err();
            assert_eq!(err.kind(), kind, "POST {status}");
            assert!(err.reason().contains(reason));
        }
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Err(GeocodioError::Transport("connection refused".to_string())));

        let client = GeocodioClient::with_transport(Some("k".to_string()), transport);
        let err = client.geocode("a").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.reason().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Ok(RawResponse::new(200, "OK", "not json")));

        let client = GeocodioClient::with_transport(Some("k".to_string()), transport);
        let err = client.geocode("a").await.unwrap_err();
        assert!(matches!(err, GeocodioError::Decode(_)));
    }

    #[tokio::test]
    async fn test_base_url_override() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|url, _| url == "http://localhost:8080/v1/geocode")
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "OK", "{}")));

        let client = GeocodioClient::with_transport(Some("k".to_string()), transport)
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        client.geocode("a").await.unwrap();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client =
            GeocodioClient::with_transport(Some("secret".to_string()), MockHttpTransport::new());
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_client_creation() {
        let client = GeocodioClient::new(Some("key".to_string())).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.api_key(), Some("key"));
    }

    #[test]
    fn test_from_invalid_config() {
        let config = GeocodioConfig {
            timeout_secs: 0,
            ..GeocodioConfig::default()
        };
        let err = GeocodioClient::from_config(&config).unwrap_err();
        assert!(matches!(err, GeocodioError::Configuration(_)));
    }
}
