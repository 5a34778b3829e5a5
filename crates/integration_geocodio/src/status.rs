//! Response classification
//!
//! Maps an HTTP status code and reason phrase onto the outcome of a call.
//! The mapping is total: every status other than the documented ones falls
//! into [`ResponseStatus::UnknownError`].

use crate::error::GeocodioError;

/// Prefix of the message carried by [`ResponseStatus::UnknownError`]
pub const UNKNOWN_ERROR_PREFIX: &str = "There was a problem with your request - ";

/// Outcome of a Geocodio response, derived from its status code alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    /// HTTP 200, body should be decoded
    Success,
    /// HTTP 403
    AuthError(String),
    /// HTTP 422
    DataError(String),
    /// HTTP 500
    ServerError(String),
    /// Anything else
    UnknownError(String),
}

impl ResponseStatus {
    /// Returns true for [`ResponseStatus::Success`]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Convert the outcome into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the matching [`GeocodioError`] for every non-success outcome.
    pub fn into_result(self) -> Result<(), GeocodioError> {
        match self {
            Self::Success => Ok(()),
            Self::AuthError(reason) => Err(GeocodioError::Auth(reason)),
            Self::DataError(reason) => Err(GeocodioError::Data(reason)),
            Self::ServerError(reason) => Err(GeocodioError::Server(reason)),
            Self::UnknownError(message) => Err(GeocodioError::Unknown(message)),
        }
    }
}

/// Classify a status code and reason phrase
#[must_use]
pub fn classify(status: u16, reason: &str) -> ResponseStatus {
    match status {
        200 => ResponseStatus::Success,
        403 => ResponseStatus::AuthError(reason.to_string()),
        422 => ResponseStatus::DataError(reason.to_string()),
        500 => ResponseStatus::ServerError(reason.to_string()),
        _ => ResponseStatus::UnknownError(format!("{UNKNOWN_ERROR_PREFIX}{reason}")),
    }
}
