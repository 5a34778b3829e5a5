//! Query inputs
//!
//! A [`Query`] is what ends up in the `q` parameter of a single request.
//! A [`BatchQuery`] is the JSON body of a batch request.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// API endpoint segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    /// Forward geocoding (`/geocode`)
    #[default]
    Geocode,
    /// Address parsing without coordinate resolution (`/parse`)
    Parse,
}

impl Verb {
    /// URL path segment for this verb
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Geocode => "geocode",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address split into components
///
/// Empty components are left out when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAddress {
    /// Street line, e.g. "1109 N Highland St"
    pub street: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or province
    pub state: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Country
    pub country: Option<String>,
}

impl StructuredAddress {
    /// Create an empty structured address
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the street line
    #[must_use]
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Set the city
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the state
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the postal code
    #[must_use]
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

impl fmt::Display for StructuredAddress {
    /// Renders as "street, city, state postal_code, country"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_empty = |part: &Option<String>| {
            part.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        let region = [non_empty(&self.state), non_empty(&self.postal_code)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let parts: Vec<String> = [
            non_empty(&self.street),
            non_empty(&self.city),
            Some(region).filter(|r| !r.is_empty()),
            non_empty(&self.country),
        ]
        .into_iter()
        .flatten()
        .collect();

        f.write_str(&parts.join(", "))
    }
}

/// A single geocoding query
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Free-text address, passed through as-is
    Address(String),
    /// Address given as components
    Structured(StructuredAddress),
    /// Latitude/longitude pair, rendered as "lat,lng"
    Coordinates {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lng: f64,
    },
}

impl Query {
    /// Free-text address query
    #[must_use]
    pub fn address(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }

    /// Coordinate query
    #[must_use]
    pub const fn coordinates(lat: f64, lng: f64) -> Self {
        Self::Coordinates { lat, lng }
    }

    /// The value sent as the `q` parameter
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(address),
            Self::Structured(address) => write!(f, "{address}"),
            Self::Coordinates { lat, lng } => write!(f, "{lat},{lng}"),
        }
    }
}

impl From<&str> for Query {
    fn from(address: &str) -> Self {
        Self::Address(address.to_string())
    }
}

impl From<String> for Query {
    fn from(address: String) -> Self {
        Self::Address(address)
    }
}

impl From<StructuredAddress> for Query {
    fn from(address: StructuredAddress) -> Self {
        Self::Structured(address)
    }
}

impl From<(f64, f64)> for Query {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::Coordinates { lat, lng }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Several queries submitted in one request
///
/// A list serializes to a JSON array, a keyed batch to a JSON object whose
/// keys are the caller's identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchQuery {
    /// Ordered queries
    List(Vec<Query>),
    /// Queries keyed by caller-supplied identifier
    ///
    /// Identifiers are unique. Building a keyed batch from pairs that repeat
    /// an identifier keeps the last query given for it.
    Keyed(BTreeMap<String, Query>),
}

impl BatchQuery {
    /// Number of queries in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(queries) => queries.len(),
            Self::Keyed(queries) => queries.len(),
        }
    }

    /// Returns true if the batch holds no queries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the batch into the request body
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<Q: Into<Query>> From<Vec<Q>> for BatchQuery {
    fn from(queries: Vec<Q>) -> Self {
        Self::List(queries.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, Q: Into<Query>> From<BTreeMap<K, Q>> for BatchQuery {
    fn from(queries: BTreeMap<K, Q>) -> Self {
        Self::Keyed(
            queries
                .into_iter()
                .map(|(id, query)| (id.into(), query.into()))
                .collect(),
        )
    }
}

/// A repeated identifier keeps its last query
impl<K: Into<String>, Q: Into<Query>, const N: usize> From<[(K, Q); N]> for BatchQuery {
    fn from(queries: [(K, Q); N]) -> Self {
        Self::Keyed(
            queries
                .into_iter()
                .map(|(id, query)| (id.into(), query.into()))
                .collect(),
        )
    }
}
