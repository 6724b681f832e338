//! Wire types for the Nominatim-compatible geocoding API.
//!
//! Nominatim quirks worth knowing:
//! - `lat`/`lon` are returned as strings, not numbers.
//! - The `address` object uses different keys depending on the place type
//!   (`city` vs `town` vs `village`, `suburb` vs `neighbourhood`).

use serde::Deserialize;

use crate::domain::{Coordinate, StructuredAddress};

use super::error::GeoError;

/// One place in a `/search` or `/reverse` response (`format=jsonv2`).
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

/// The structured `address` object of a place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub amenity: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl NominatimPlace {
    /// Parse the string-typed coordinate pair.
    pub fn coordinate(&self) -> Result<Coordinate, GeoError> {
        let latitude: f64 = self.lat.parse().map_err(|_| GeoError::Json {
            message: format!("invalid lat in response: {:?}", self.lat),
        })?;
        let longitude: f64 = self.lon.parse().map_err(|_| GeoError::Json {
            message: format!("invalid lon in response: {:?}", self.lon),
        })?;

        Coordinate::new(latitude, longitude).map_err(|e| GeoError::Json {
            message: format!("out-of-range coordinate in response: {e}"),
        })
    }

    /// Convert the structured address fields to the domain type.
    ///
    /// Falls back to `display_name` as the landmark name when no structured
    /// fields were returned at all.
    pub fn structured_address(&self) -> StructuredAddress {
        match &self.address {
            Some(addr) => StructuredAddress {
                name: addr.amenity.clone().or_else(|| addr.building.clone()),
                street: addr.road.clone(),
                street_number: addr.house_number.clone(),
                district: addr.suburb.clone().or_else(|| addr.neighbourhood.clone()),
                city: addr.city.clone().or_else(|| addr.town.clone()),
                region: addr.state.clone(),
            },
            None => StructuredAddress {
                name: self.display_name.clone(),
                ..StructuredAddress::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_result() {
        let json = r#"[{
            "lat": "-19.8721",
            "lon": "-43.9673",
            "display_name": "UFMG, Belo Horizonte",
            "address": {
                "amenity": "Universidade Federal de Minas Gerais",
                "road": "Avenida Antônio Carlos",
                "house_number": "6627",
                "suburb": "Pampulha",
                "city": "Belo Horizonte",
                "state": "Minas Gerais"
            }
        }]"#;

        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        assert_eq!(places.len(), 1);

        let coord = places[0].coordinate().unwrap();
        assert!((coord.latitude - -19.8721).abs() < 1e-9);

        let addr = places[0].structured_address();
        assert_eq!(
            addr.name.as_deref(),
            Some("Universidade Federal de Minas Gerais")
        );
        assert_eq!(addr.district.as_deref(), Some("Pampulha"));
    }

    #[test]
    fn town_used_when_city_missing() {
        let json = r#"{
            "lat": "-19.9",
            "lon": "-44.0",
            "address": { "road": "Rua Principal", "town": "Sarzedo" }
        }"#;

        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        assert_eq!(place.structured_address().city.as_deref(), Some("Sarzedo"));
    }

    #[test]
    fn display_name_fallback_without_address() {
        let json = r#"{ "lat": "-19.9", "lon": "-44.0", "display_name": "Somewhere" }"#;

        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        let addr = place.structured_address();
        assert_eq!(addr.name.as_deref(), Some("Somewhere"));
        assert!(addr.street.is_none());
    }

    #[test]
    fn invalid_lat_is_json_error() {
        let json = r#"{ "lat": "not-a-number", "lon": "-44.0" }"#;

        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        assert!(matches!(place.coordinate(), Err(GeoError::Json { .. })));
    }
}
