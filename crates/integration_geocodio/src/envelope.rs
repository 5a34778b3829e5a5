//! Result envelope
//!
//! A successful response body is decoded exactly once into a
//! [`serde_json::Value`]. The typed accessors read from that value, so the
//! raw structure is always available even for fields the models don't cover.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GeocodioError;
use crate::models::{BatchResponse, GeocodeResponse, GeocodeResult, Input, ParsedAddress};

/// Decoded body of a successful Geocodio response
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    raw: Value,
}

impl ResultEnvelope {
    /// Decode a response body
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if the body is not valid JSON.
    pub fn from_slice(body: &[u8]) -> Result<Self, GeocodioError> {
        let raw = serde_json::from_slice(body)
            .map_err(|e| GeocodioError::Decode(format!("invalid JSON in response body: {e}")))?;
        Ok(Self { raw })
    }

    /// Wrap an already decoded value
    #[must_use]
    pub const fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The decoded body as returned by the service
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Take the decoded body
    #[must_use]
    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Decode the body into a caller-provided type
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if the body doesn't match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, GeocodioError> {
        T::deserialize(&self.raw).map_err(|e| GeocodioError::Decode(e.to_string()))
    }

    /// The body as a single geocode response
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if the body doesn't have that shape.
    pub fn geocode(&self) -> Result<GeocodeResponse, GeocodioError> {
        self.decode()
    }

    /// The body as a parse response
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if the body doesn't have that shape.
    pub fn parsed(&self) -> Result<ParsedAddress, GeocodioError> {
        self.decode()
    }

    /// The body as a batch response
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if the body doesn't have that shape.
    pub fn batch(&self) -> Result<BatchResponse, GeocodioError> {
        self.decode()
    }

    /// The `input` section, if present
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if `input` is present but malformed.
    pub fn input(&self) -> Result<Option<Input>, GeocodioError> {
        self.raw
            .get("input")
            .map(|input| {
                Input::deserialize(input).map_err(|e| GeocodioError::Decode(e.to_string()))
            })
            .transpose()
    }

    /// The `results` list, empty if the body has none
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if `results` is not a list of matches.
    pub fn results(&self) -> Result<Vec<GeocodeResult>, GeocodioError> {
        match self.raw.get("results") {
            Some(results) => Vec::<GeocodeResult>::deserialize(results)
                .map_err(|e| GeocodioError::Decode(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// The first entry of `results`
    ///
    /// # Errors
    ///
    /// Returns [`GeocodioError::Decode`] if `results` is not a list or its
    /// first entry is not a valid match.
    pub fn first(&self) -> Result<Option<GeocodeResult>, GeocodioError> {
        let Some(results) = self.raw.get("results") else {
            return Ok(None);
        };
        let results = results.as_array().ok_or_else(|| {
            GeocodioError::Decode(format!("expected a list of results, got {results}"))
        })?;

        results
            .first()
            .map(|first| {
                GeocodeResult::deserialize(first).map_err(|e| GeocodioError::Decode(e.to_string()))
            })
            .transpose()
    }
}
