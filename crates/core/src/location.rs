use crate::continent::{continent_code_for_country, Continent};
use crate::domain::{AddressComponent, CountryCode, Post};
use crate::ports::Geocoder;
use tracing::debug;

/// Resolves the country code, then the continent.
///
/// Fields that are already set are never overwritten, so calling this again is a no-op.
pub fn resolve_location(post: &mut Post, geocoder: Option<&dyn Geocoder>) {
    resolve_country_code(post, geocoder);
    resolve_continent(post);
}

pub fn resolve_country_code(post: &mut Post, geocoder: Option<&dyn Geocoder>) {
    if post.country_code.is_some() {
        return;
    }

    if let Some(code) = post
        .hints()
        .place_country_code
        .as_deref()
        .and_then(CountryCode::parse)
    {
        post.country_code = Some(code);
        return;
    }

    let (Some(geocoder), Some(query)) = (geocoder, post.hints().user_location.clone()) else {
        return;
    };
    if query.trim().is_empty() {
        return;
    }

    match geocoder.geocode(&query) {
        Ok(Some(components)) => post.country_code = country_from_components(&components),
        Ok(None) => debug!(%query, "geocoder found no match"),
        Err(err) => debug!(%query, error = %err, "geocoding failed, leaving country code unset"),
    }
}

pub fn resolve_continent(post: &mut Post) {
    if post.continent.is_some() {
        return;
    }
    post.continent = post.country_code.as_ref().and_then(continent_for_country);
}

/// Looks up the continent of a country; "AQ" maps to Antarctica directly
pub fn continent_for_country(code: &CountryCode) -> Option<Continent> {
    if code.as_str() == "AQ" {
        return Some(Continent::Antarctica);
    }
    continent_code_for_country(code.as_str()).and_then(Continent::from_code)
}

/// Picks the country code out of geocoder output.
///
/// Providers list components most specific first, so only the last two
/// positions are checked for a `country` component.
pub fn country_from_components(components: &[AddressComponent]) -> Option<CountryCode> {
    components
        .iter()
        .rev()
        .take(2)
        .find(|component| component.is_country())
        .and_then(|component| CountryCode::parse(&component.short_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{at, raw};
    use crate::domain::RawPlace;
    use crate::error::GeocodeError;
    use std::sync::Mutex;

    fn component(short_name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: short_name.to_string(),
            short_name: short_name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    struct StubGeocoder {
        response: Result<Option<Vec<AddressComponent>>, GeocodeError>,
        queries: Mutex<Vec<String>>,
    }

    impl StubGeocoder {
        fn new(response: Result<Option<Vec<AddressComponent>>, GeocodeError>) -> Self {
            Self {
                response,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, query: &str) -> Result<Option<Vec<AddressComponent>>, GeocodeError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.response.clone()
        }
    }

    fn post_with(place: Option<&str>, user_location: Option<&str>, geocoder: Option<&dyn Geocoder>) -> Post {
        let mut raw = raw(&["x"], at(10, 0));
        raw.place = place.map(|code| RawPlace {
            country_code: Some(code.to_string()),
        });
        raw.author.location = user_location.map(str::to_string);
        Post::new(raw, geocoder)
    }

    fn brussels() -> Vec<AddressComponent> {
        vec![
            component("Brussels", &["locality", "political"]),
            component("Brussels", &["administrative_area_level_1", "political"]),
            component("BE", &["country", "political"]),
        ]
    }

    #[test]
    fn test_place_code_is_adopted_without_geocoding() {
        let geocoder = StubGeocoder::new(Ok(Some(brussels())));
        let post = post_with(Some("US"), Some("Brussels"), Some(&geocoder));
        assert_eq!(post.country_code().unwrap().as_str(), "US");
        assert_eq!(post.continent(), Some(Continent::NorthAmerica));
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn test_geocoder_used_when_place_missing() {
        let geocoder = StubGeocoder::new(Ok(Some(brussels())));
        let post = post_with(None, Some("Brussels"), Some(&geocoder));
        assert_eq!(post.country_code().unwrap().as_str(), "BE");
        assert_eq!(post.continent(), Some(Continent::Europe));
        assert_eq!(geocoder.queries.lock().unwrap().as_slice(), ["Brussels"]);
    }

    #[test]
    fn test_invalid_place_code_falls_through_to_geocoder() {
        let geocoder = StubGeocoder::new(Ok(Some(brussels())));
        let post = post_with(Some("USA"), Some("Brussels"), Some(&geocoder));
        assert_eq!(post.country_code().unwrap().as_str(), "BE");
    }

    #[test]
    fn test_no_geocoder_means_no_lookup() {
        let post = post_with(None, Some("Brussels"), None);
        assert!(post.country_code().is_none());
        assert!(post.continent().is_none());
    }

    #[test]
    fn test_missing_user_location_skips_geocoder() {
        let geocoder = StubGeocoder::new(Ok(Some(brussels())));
        let post = post_with(None, None, Some(&geocoder));
        assert!(post.country_code().is_none());
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn test_geocoder_error_leaves_location_absent() {
        let geocoder = StubGeocoder::new(Err(GeocodeError::Transport("connection reset".to_string())));
        let post = post_with(None, Some("Somewhere"), Some(&geocoder));
        assert!(post.country_code().is_none());
        assert!(post.continent().is_none());
        assert!(!post.has_location());
    }

    #[test]
    fn test_geocoder_no_match_leaves_location_absent() {
        let geocoder = StubGeocoder::new(Ok(None));
        let post = post_with(None, Some("Nowhere"), Some(&geocoder));
        assert!(post.country_code().is_none());
    }

    #[test]
    fn test_country_from_components_uses_second_to_last() {
        let components = vec![
            component("Paris", &["locality"]),
            component("FR", &["country", "political"]),
            component("75001", &["postal_code"]),
        ];
        assert_eq!(country_from_components(&components).unwrap().as_str(), "FR");
    }

    #[test]
    fn test_country_from_components_ignores_earlier_positions() {
        let components = vec![
            component("FR", &["country"]),
            component("Paris", &["locality"]),
            component("75001", &["postal_code"]),
        ];
        assert!(country_from_components(&components).is_none());
    }

    #[test]
    fn test_country_from_components_prefers_last() {
        let components = vec![component("DE", &["country"]), component("AT", &["country"])];
        assert_eq!(country_from_components(&components).unwrap().as_str(), "AT");
    }

    #[test]
    fn test_country_from_components_empty() {
        assert!(country_from_components(&[]).is_none());
    }

    #[test]
    fn test_antarctica_bypasses_general_table() {
        let post = post_with(Some("AQ"), None, None);
        assert_eq!(post.country_code().unwrap().as_str(), "AQ");
        assert_eq!(post.continent(), Some(Continent::Antarctica));
    }

    #[test]
    fn test_unknown_code_gets_no_continent() {
        let post = post_with(Some("ZZ"), None, None);
        assert_eq!(post.country_code().unwrap().as_str(), "ZZ");
        assert!(post.continent().is_none());
        assert!(!post.has_location());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut post = post_with(Some("BE"), None, None);
        let geocoder = StubGeocoder::new(Ok(Some(vec![component("US", &["country"])])));
        for _ in 0..3 {
            resolve_location(&mut post, Some(&geocoder));
        }
        assert_eq!(post.country_code().unwrap().as_str(), "BE");
        assert_eq!(post.continent(), Some(Continent::Europe));
        assert_eq!(geocoder.calls(), 0);
    }

    #[test]
    fn test_later_resolution_fills_missing_location() {
        let mut post = post_with(None, Some("Brussels"), None);
        assert!(!post.has_location());
        let geocoder = StubGeocoder::new(Ok(Some(brussels())));
        resolve_location(&mut post, Some(&geocoder));
        assert!(post.has_location());
        assert_eq!(post.continent(), Some(Continent::Europe));
    }
}
