//! Geocoding provider boundary.
//!
//! The engine consumes geocoding, it does not implement it. This module
//! defines the [`GeoProvider`] trait plus an HTTP client for a
//! Nominatim-compatible API, a mock provider for tests, and the device
//! position source used by the "use current location" path.
//!
//! Key characteristics of the provider:
//! - Forward geocoding is precise but unforgiving of partial input, which
//!   is why the search layer expands queries with contextual suffixes.
//! - Public instances are rate limited, so the client caps concurrent
//!   requests.

mod client;
mod error;
mod mock;
mod position;
mod provider;
mod types;

pub use client::{NominatimClient, NominatimConfig};
pub use error::GeoError;
pub use mock::{FailureKind, MockGeoProvider, MockPositionSource};
pub use position::PositionSource;
pub use provider::GeoProvider;
pub use types::{NominatimAddress, NominatimPlace};
