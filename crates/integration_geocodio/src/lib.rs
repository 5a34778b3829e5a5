#![forbid(unsafe_code)]
//! Geocodio integration
//!
//! Client for the [Geocodio](https://www.geocod.io) geocoding API. Supports
//! forward geocoding of single addresses or coordinates, address parsing, and
//! batch geocoding of many queries in one request.
//!
//! # Architecture
//!
//! [`GeocodioClient`] owns the API key and builds requests. It talks to the
//! network only through an [`HttpTransport`], which defaults to the
//! `reqwest`-backed [`ReqwestTransport`] and can be replaced for tests or a
//! different HTTP stack. Every response status goes through
//! [`status::classify`]; successful bodies are decoded once into a
//! [`ResultEnvelope`] with typed accessors over the raw JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocodio::GeocodioClient;
//!
//! let client = GeocodioClient::new(Some("YOUR_API_KEY".to_string()))?;
//!
//! let envelope = client.geocode("1109 N Highland St, Arlington VA").await?;
//! if let Some(best) = envelope.first()? {
//!     println!("{:?} -> {}, {}", best.formatted_address, best.location.lat, best.location.lng);
//! }
//!
//! let batch = client
//!     .batch_geocode([
//!         ("home", "1109 N Highland St, Arlington VA"),
//!         ("work", "525 University Ave, Toronto"),
//!     ])
//!     .await?
//!     .batch()?;
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod models;
mod query;
pub mod status;
mod transport;

pub use client::GeocodioClient;
pub use config::{DEFAULT_BASE_URL, GeocodioConfig};
pub use envelope::ResultEnvelope;
pub use error::{ErrorKind, GeocodioError};
pub use models::{
    AddressComponents, BatchItem, BatchResponse, BatchResults, GeocodeResponse, GeocodeResult,
    Input, Location, ParsedAddress,
};
pub use query::{BatchQuery, Query, StructuredAddress, Verb};
pub use status::{ResponseStatus, classify};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
