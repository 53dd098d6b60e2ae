//! Open-Meteo geocoding API
//!
//! Turns a city name into coordinates. Only the first match is used.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::{FetchError, GeoLocation};

/// Default geocoding search endpoint
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Parameters for a geocoding search
#[derive(Debug, Clone)]
pub struct GeocodingRequest {
    base_url: String,
    language: String,
}

impl Default for GeocodingRequest {
    fn default() -> Self {
        Self::new(GEOCODING_URL)
    }
}

impl GeocodingRequest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            language: "en".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builds the search URL for `city`, which is sent as-is (URL-encoded)
    pub fn url(&self, city: &str) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("name", city),
                ("count", "1"),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

/// Extracts the first match from a geocoding response
///
/// Returns `Ok(None)` when `results` is absent or empty; that is a
/// "not found" outcome, not a transport failure.
pub fn parse_first_match(body: Value) -> Result<Option<GeoLocation>, FetchError> {
    let response: GeocodingResponse = serde_json::from_value(body)
        .map_err(|e| FetchError::InvalidData(format!("geocoding response: {}", e)))?;

    Ok(response
        .results
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|m| GeoLocation {
            latitude: m.latitude,
            longitude: m.longitude,
            name: m.name,
            country: m.country,
            timezone: m.timezone,
        }))
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingMatch>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingMatch {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
    timezone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_encodes_city_and_sets_params() {
        let url = GeocodingRequest::default().url("New York").unwrap();
        let s = url.as_str();
        assert!(s.starts_with(GEOCODING_URL));
        assert!(s.contains("name=New+York"));
        assert!(s.contains("count=1"));
        assert!(s.contains("language=en"));
        assert!(s.contains("format=json"));
    }

    #[test]
    fn test_url_preserves_diacritics() {
        let url = GeocodingRequest::default().url("Zürich").unwrap();
        let name = url
            .query_pairs()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| v.into_owned());
        assert_eq!(name.as_deref(), Some("Zürich"));
    }

    #[test]
    fn test_url_language_override() {
        let url = GeocodingRequest::default()
            .with_language("de")
            .url("Berlin")
            .unwrap();
        assert!(url.as_str().contains("language=de"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GeocodingRequest::new("not a url").url("Paris").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_first_match() {
        let body = json!({
            "results": [
                {"id": 2643743, "name": "London", "latitude": 51.50853, "longitude": -0.12574,
                 "country": "United Kingdom", "timezone": "Europe/London"},
                {"id": 6058560, "name": "London", "latitude": 42.98339, "longitude": -81.23304,
                 "country": "Canada", "timezone": "America/Toronto"}
            ],
            "generationtime_ms": 0.8
        });

        let location = parse_first_match(body).unwrap().unwrap();
        assert_eq!(location.name, "London");
        assert!((location.latitude - 51.50853).abs() < 1e-9);
        assert_eq!(location.country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn test_parse_missing_results_is_not_found() {
        let body = json!({"generationtime_ms": 0.5});
        assert!(parse_first_match(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_empty_results_is_not_found() {
        let body = json!({"results": []});
        assert!(parse_first_match(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_match_is_invalid_data() {
        let body = json!({"results": [{"name": "London"}]});
        assert!(matches!(
            parse_first_match(body),
            Err(FetchError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_non_object_is_invalid_data() {
        assert!(matches!(
            parse_first_match(Value::Null),
            Err(FetchError::InvalidData(_))
        ));
    }
}
