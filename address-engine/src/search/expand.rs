//! Query expansion.
//!
//! The forward geocoder is precise but unforgiving of partial input:
//! "icex" alone finds nothing, "icex, UFMG" does. Progressively appending
//! disambiguating context raises the hit rate without requiring the user
//! to type it.

use super::config::LandmarkContext;

/// Produce the ordered list of query variants to forward-geocode.
///
/// The raw query always comes first, then the query with fixed contextual
/// suffixes in order of increasing breadth. Deterministic for a given
/// context; the first variant with matches wins.
pub fn expand(query: &str, context: &LandmarkContext) -> Vec<String> {
    vec![
        query.to_string(),
        format!("{query}, {}", context.primary_landmark),
        format!("{query}, {}", context.neighborhood),
        format!("{query}, {}", context.city),
        format!("{query}, {}, {}", context.city, context.region),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_query_first_then_fixed_suffix_order() {
        let variants = expand("icex", &LandmarkContext::default());

        assert_eq!(
            variants,
            vec![
                "icex",
                "icex, UFMG",
                "icex, Pampulha",
                "icex, Belo Horizonte",
                "icex, Belo Horizonte, MG",
            ]
        );
    }

    #[test]
    fn deterministic_for_same_context() {
        let context = LandmarkContext::default();
        assert_eq!(expand("rua 123", &context), expand("rua 123", &context));
    }

    #[test]
    fn custom_context() {
        let context = LandmarkContext {
            primary_landmark: "USP".to_string(),
            neighborhood: "Butantã".to_string(),
            city: "São Paulo".to_string(),
            region: "SP".to_string(),
            ..LandmarkContext::default()
        };

        let variants = expand("biblioteca", &context);
        assert_eq!(variants[1], "biblioteca, USP");
        assert_eq!(variants[4], "biblioteca, São Paulo, SP");
    }
}
