//! Device position source.

use async_trait::async_trait;

use crate::domain::Coordinate;

use super::error::GeoError;

/// A source of the device's current position.
///
/// On mobile this wraps the platform location service; in tests it is a
/// mock. Fetches can block on GPS for a long time, so callers wrap them in
/// a hard timeout (see `SearchController::use_current_location`).
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetch the current device position.
    ///
    /// Returns [`GeoError::PermissionDenied`] when the user has refused
    /// location access.
    async fn current_position(&self) -> Result<Coordinate, GeoError>;
}
