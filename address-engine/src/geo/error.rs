//! Geocoding provider error types.

/// Errors from a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the provider
    #[error("rate limited by geocoding provider")]
    RateLimited,

    /// Location permission refused by the user or platform
    #[error("location permission denied")]
    PermissionDenied,
}

impl GeoError {
    /// Whether retrying the same request later could succeed.
    ///
    /// Permission refusals are not transient: the user has to change a
    /// platform setting first.
    pub fn is_transient(&self) -> bool {
        !matches!(self, GeoError::PermissionDenied)
    }
}
