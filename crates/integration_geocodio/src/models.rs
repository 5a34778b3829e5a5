//! Geocodio response models
//!
//! Typed view of the documented response fields. Every struct keeps fields
//! it does not know about in `extra` and defaults missing optional fields,
//! so new service fields never break decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Latitude/longitude pair as returned by the API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Location {
    /// Returns true if both values lie within valid degree ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Address split into components by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponents {
    pub number: Option<String>,
    pub predirectional: Option<String>,
    pub prefix: Option<String>,
    pub street: Option<String>,
    pub suffix: Option<String>,
    pub postdirectional: Option<String>,
    pub secondaryunit: Option<String>,
    pub secondarynumber: Option<String>,
    pub formatted_street: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The query as the service understood it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    pub address_components: AddressComponents,
    pub formatted_address: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One candidate match for a geocoded address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: AddressComponents,
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub location: Location,
    /// Confidence between 0 and 1
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// e.g. "rooftop", "range_interpolation", "point"
    #[serde(default)]
    pub accuracy_type: Option<String>,
    /// Data source the match came from
    #[serde(default)]
    pub source: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a single `/geocode` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResponse {
    pub input: Option<Input>,
    pub results: Vec<GeocodeResult>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeocodeResponse {
    /// The best match, if any
    #[must_use]
    pub fn first(&self) -> Option<&GeocodeResult> {
        self.results.first()
    }
}

/// Body of a `/parse` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedAddress {
    pub address_components: AddressComponents,
    pub formatted_address: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// The query as submitted
    pub query: String,
    /// The geocoding outcome for that query
    #[serde(default)]
    pub response: GeocodeResponse,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Batch results, shaped like the submitted batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchResults {
    /// Answer to a list batch, in submission order
    List(Vec<BatchItem>),
    /// Answer to a keyed batch
    Keyed(BTreeMap<String, BatchItem>),
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Body of a batch `/geocode` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchResponse {
    pub results: BatchResults,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchResponse {
    /// Number of answered queries
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.results {
            BatchResults::List(items) => items.len(),
            BatchResults::Keyed(items) => items.len(),
        }
    }

    /// Returns true if no query was answered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a keyed result by the identifier supplied with the batch
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BatchItem> {
        match &self.results {
            BatchResults::Keyed(items) => items.get(id),
            BatchResults::List(_) => None,
        }
    }

    /// All answered items, in submission order for lists and key order otherwise
    pub fn items(&self) -> Box<dyn Iterator<Item = &BatchItem> + '_> {
        match &self.results {
            BatchResults::List(items) => Box::new(items.iter()),
            BatchResults::Keyed(items) => Box::new(items.values()),
        }
    }
}
