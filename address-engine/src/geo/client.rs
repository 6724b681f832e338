//! Nominatim HTTP client.
//!
//! Provides async forward and reverse geocoding against any
//! Nominatim-compatible endpoint. Uses a semaphore to limit concurrent
//! requests: the public instance enforces strict rate limits.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::Semaphore;

use crate::domain::{Coordinate, StructuredAddress};

use super::error::GeoError;
use super::provider::GeoProvider;
use super::types::NominatimPlace;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Maximum forward matches requested per query.
const FORWARD_LIMIT: &str = "10";

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// User-Agent header value; the public instance rejects anonymous clients.
    pub user_agent: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a new config with the given User-Agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP geocoding client for a Nominatim-compatible API.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, GeoError> {
        let mut headers = HeaderMap::new();

        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| GeoError::Api {
                status: 0,
                message: "Invalid User-Agent value".to_string(),
            })?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Issue a GET and decode the body, mapping error statuses.
    async fn get_places(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<NominatimPlace>, GeoError> {
        // Closed semaphore is unreachable: we never close it.
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GeoError::Api {
                status: 0,
                message: "request limiter closed".to_string(),
            })?;

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // /search returns an array; /reverse returns a single object.
        if let Ok(places) = serde_json::from_str::<Vec<NominatimPlace>>(&body) {
            return Ok(places);
        }

        serde_json::from_str::<NominatimPlace>(&body)
            .map(|place| vec![place])
            .map_err(|e| GeoError::Json {
                message: e.to_string(),
            })
    }
}

/// Coordinates of the parseable places; malformed entries are skipped.
///
/// One bad `lat`/`lon` pair must not sink an otherwise-good suggestion
/// list.
fn parseable_coordinates(places: &[NominatimPlace]) -> Vec<Coordinate> {
    places
        .iter()
        .filter_map(|place| match place.coordinate() {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                tracing::debug!(error = %e, "skipping place with malformed coordinates");
                None
            }
        })
        .collect()
}

#[async_trait]
impl GeoProvider for NominatimClient {
    async fn forward(&self, query: &str) -> Result<Vec<Coordinate>, GeoError> {
        let url = format!("{}/search", self.base_url);
        let places = self
            .get_places(
                &url,
                &[
                    ("q", query),
                    ("format", "jsonv2"),
                    ("limit", FORWARD_LIMIT),
                ],
            )
            .await?;

        tracing::debug!(query, matches = places.len(), "forward geocode");

        Ok(parseable_coordinates(&places))
    }

    async fn reverse(&self, position: Coordinate) -> Result<Vec<StructuredAddress>, GeoError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = position.latitude.to_string();
        let lon = position.longitude.to_string();

        let places = self
            .get_places(
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("format", "jsonv2"),
                    ("addressdetails", "1"),
                ],
            )
            .await?;

        Ok(places
            .iter()
            .map(NominatimPlace::structured_address)
            .collect())
    }
}
