//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward search and reverse lookup.
//! Usage policy requires an identifying User-Agent and at most one request
//! per second.

use crate::config::GeocodingConfig;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, SearchResult};
use serde::Deserialize;
use std::time::Duration;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    language: String,
    limit: usize,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// Nominatim answers 200 with an `error` field when nothing is found.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimBackend {
    /// Create a new Nominatim backend from the geocoding settings
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            limit: config.search_limit,
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit={}&accept-language={}",
            self.base_url,
            urlencoding::encode(query),
            self.limit,
            self.language
        )
    }

    fn reverse_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json&accept-language={}",
            self.base_url, coords.lat, coords.lng, self.language
        )
    }

    /// Parse lat/lng strings to coordinates
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat.trim().parse().map_err(|_| {
            Error::GeocodingUnavailable(format!("Invalid latitude: {}", lat))
        })?;
        let lng: f64 = lng.trim().parse().map_err(|_| {
            Error::GeocodingUnavailable(format!("Invalid longitude: {}", lng))
        })?;
        Ok(Coordinates::new(lat, lng))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::GeocodingUnavailable(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::GeocodingUnavailable(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

impl GeoBackend for NominatimBackend {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let results: Vec<NominatimResult> = self
            .get(&self.search_url(query))
            .await?
            .json()
            .await
            .map_err(|e| {
                Error::GeocodingUnavailable(format!("Failed to parse Nominatim response: {}", e))
            })?;

        results
            .into_iter()
            .map(|result| {
                let coordinates = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(SearchResult::new(result.display_name, coordinates))
            })
            .collect()
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        let result: NominatimReverse = self
            .get(&self.reverse_url(coords))
            .await?
            .json()
            .await
            .map_err(|e| {
                Error::GeocodingUnavailable(format!("Failed to parse Nominatim response: {}", e))
            })?;

        if let Some(reason) = result.error {
            tracing::debug!("Nominatim has no address at {}: {}", coords, reason);
            return Ok(None);
        }

        Ok(result.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn backend() -> NominatimBackend {
        NominatimBackend::new(&GeocodingConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_coords() {
        let coords = NominatimBackend::parse_coords("48.1482", "17.1067").unwrap();
        assert_relative_eq!(coords.lat, 48.1482);
        assert_relative_eq!(coords.lng, 17.1067);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimBackend::parse_coords("invalid", "0").is_err());
        assert!(NominatimBackend::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = backend().search_url("Obchodná 5, Bratislava");
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search?q=Obchodn%C3%A1%205%2C%20Bratislava&format=json&limit=5&accept-language=sk"
        );
    }

    #[test]
    fn test_reverse_url() {
        let url = backend().reverse_url(Coordinates::new(48.1482, 17.1067));
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse?lat=48.1482&lon=17.1067&format=json&accept-language=sk"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = GeocodingConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..GeocodingConfig::default()
        };
        let backend = NominatimBackend::new(&config).unwrap();
        assert!(backend.search_url("x").starts_with("http://localhost:8080/search?"));
    }

    #[test]
    fn test_reverse_response_shapes() {
        let found: NominatimReverse =
            serde_json::from_str(r#"{"display_name":"Obchodná, Bratislava","lat":"48.1","lon":"17.1"}"#)
                .unwrap();
        assert_eq!(found.display_name.as_deref(), Some("Obchodná, Bratislava"));
        assert!(found.error.is_none());

        let missing: NominatimReverse =
            serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(missing.display_name.is_none());
        assert!(missing.error.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let config = GeocodingConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..GeocodingConfig::default()
        };
        let backend = NominatimBackend::new(&config).unwrap();
        let err = backend.search("Main St").await.unwrap_err();
        assert!(matches!(err, Error::GeocodingUnavailable(_)));
    }
}
