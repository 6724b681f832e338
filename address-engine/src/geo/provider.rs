//! The geocoding provider abstraction.

use async_trait::async_trait;

use crate::domain::{Coordinate, StructuredAddress};

use super::error::GeoError;

/// A forward/reverse geocoding provider.
///
/// This abstraction lets the resolution engine run against the real HTTP
/// client or a mock with canned data.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Resolve free text to zero or more coordinate matches.
    ///
    /// An empty result means "no match", which is distinct from an error:
    /// the caller may retry with a more specific query variant.
    async fn forward(&self, query: &str) -> Result<Vec<Coordinate>, GeoError>;

    /// Resolve a coordinate to zero or more structured address candidates,
    /// best match first.
    async fn reverse(&self, position: Coordinate) -> Result<Vec<StructuredAddress>, GeoError>;
}
