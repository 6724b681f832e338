//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// Error from constructing a coordinate with out-of-range components.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude outside [-90, 90] or not finite
    #[error("latitude out of range: {0}")]
    Latitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("longitude out of range: {0}")]
    Longitude(f64),
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating component ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Quantized key for hashing, in units of 1e-5 degrees (~1 m).
    ///
    /// Two coordinates closer than that resolve to the same address for
    /// every provider we care about, so caches and mocks key on this.
    pub fn key_e5(&self) -> (i64, i64) {
        (
            (self.latitude * 1e5).round() as i64,
            (self.longitude * 1e5).round() as i64,
        )
    }
}
