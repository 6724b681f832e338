//! Address candidate types.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The structured fields a reverse geocoder returns for one position.
///
/// All fields are optional; providers fill in whatever they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAddress {
    /// Landmark or building name (e.g. "Escola de Engenharia").
    pub name: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    /// Neighborhood / district.
    pub district: Option<String>,
    pub city: Option<String>,
    /// State or region abbreviation.
    pub region: Option<String>,
}

impl StructuredAddress {
    /// Join the non-empty fields with `", "`, in display order.
    ///
    /// Returns `None` when no field carries text: such a result cannot be
    /// shown to the user and the candidate is dropped.
    pub fn compose(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.name.as_deref(),
            self.street.as_deref(),
            self.street_number.as_deref(),
            self.district.as_deref(),
            self.city.as_deref(),
            self.region.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A resolved location the user can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub coordinate: Coordinate,
    /// Human-readable address; never empty.
    pub composed_address: String,
    /// Whether this candidate came from the device position rather than
    /// a text search.
    #[serde(default)]
    pub is_current_location: bool,
}

impl AddressCandidate {
    /// Build a candidate from a structured address.
    ///
    /// Returns `None` when the address composes to nothing.
    pub fn from_structured(coordinate: Coordinate, address: &StructuredAddress) -> Option<Self> {
        address.compose().map(|composed_address| Self {
            coordinate,
            composed_address,
            is_current_location: false,
        })
    }
}

/// An [`AddressCandidate`] with its ranking information attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: AddressCandidate,
    /// Textual relevance against the user's query (higher is better).
    pub relevance_score: i32,
    /// Great-circle distance from the reference point, in km.
    pub distance_km: f64,
}

impl RankedCandidate {
    /// The rank-ordering value: relevance penalized by distance.
    pub fn combined_key(&self, distance_weight: f64) -> f64 {
        f64::from(self.relevance_score) - self.distance_km * distance_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord() -> Coordinate {
        Coordinate::new(-19.8721, -43.9673).unwrap()
    }

    #[test]
    fn compose_joins_non_empty_fields() {
        let addr = StructuredAddress {
            name: Some("Escola de Engenharia".to_string()),
            street: Some("Av. Antônio Carlos".to_string()),
            street_number: Some("6627".to_string()),
            district: Some("Pampulha".to_string()),
            city: Some("Belo Horizonte".to_string()),
            region: Some("MG".to_string()),
        };

        assert_eq!(
            addr.compose().unwrap(),
            "Escola de Engenharia, Av. Antônio Carlos, 6627, Pampulha, Belo Horizonte, MG"
        );
    }

    #[test]
    fn compose_skips_empty_and_whitespace_fields() {
        let addr = StructuredAddress {
            name: None,
            street: Some("Rua da Bahia".to_string()),
            street_number: Some("  ".to_string()),
            district: Some(String::new()),
            city: Some("Belo Horizonte".to_string()),
            region: None,
        };

        assert_eq!(addr.compose().unwrap(), "Rua da Bahia, Belo Horizonte");
    }

    #[test]
    fn compose_all_empty_is_none() {
        assert!(StructuredAddress::default().compose().is_none());
    }

    #[test]
    fn candidate_from_empty_address_is_dropped() {
        assert!(AddressCandidate::from_structured(coord(), &StructuredAddress::default()).is_none());
    }

    #[test]
    fn combined_key_penalizes_distance() {
        let ranked = RankedCandidate {
            candidate: AddressCandidate {
                coordinate: coord(),
                composed_address: "UFMG, Belo Horizonte".to_string(),
                is_current_location: false,
            },
            relevance_score: 6,
            distance_km: 20.0,
        };

        assert!((ranked.combined_key(0.1) - 4.0).abs() < 1e-9);
    }
}
