//! Geocodio error types

use thiserror::Error;

/// Coarse classification of a [`GeocodioError`]
///
/// Callers branch on the kind rather than on message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid, missing or unauthorized API key (HTTP 403)
    Auth,
    /// Malformed or semantically invalid query data (HTTP 422)
    Data,
    /// Upstream service failure (HTTP 500)
    Server,
    /// Any other non-success status
    Unknown,
    /// No usable HTTP response: network failure or undecodable body
    Transport,
}

/// Errors that can occur while talking to the Geocodio API
#[derive(Debug, Error)]
pub enum GeocodioError {
    /// The API rejected the credentials (HTTP 403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API rejected the query data (HTTP 422)
    #[error("Invalid query data: {0}")]
    Data(String),

    /// The API failed internally (HTTP 500)
    #[error("Server error: {0}")]
    Server(String),

    /// Any other non-success status
    #[error("{0}")]
    Unknown(String),

    /// DNS, connection, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 200 response whose body is not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration or request construction failure
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GeocodioError {
    /// The kind this error belongs to
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Data(_) => ErrorKind::Data,
            Self::Server(_) => ErrorKind::Server,
            Self::Unknown(_) | Self::Configuration(_) => ErrorKind::Unknown,
            Self::Transport(_) | Self::Decode(_) => ErrorKind::Transport,
        }
    }

    /// The reason string carried by this error, verbatim
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Auth(reason)
            | Self::Data(reason)
            | Self::Server(reason)
            | Self::Unknown(reason)
            | Self::Transport(reason)
            | Self::Decode(reason)
            | Self::Configuration(reason) => reason,
        }
    }

    /// Returns true if a later attempt might succeed unchanged
    ///
    /// The client never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Transport(_))
    }
}

impl From<reqwest::Error> for GeocodioError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key
        let err = err.without_url();
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
