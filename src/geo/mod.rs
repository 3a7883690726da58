//! Geocoding module
//!
//! Forward search (free text to candidate coordinates) and reverse lookup
//! (coordinates to a display address) behind the `GeoBackend` trait, plus
//! the `GeocodingClient` that applies the timeout, the blank-query guard and
//! the coordinate fallback on top of any backend.

pub mod nominatim;
pub mod offline;

use crate::config::GeocodingConfig;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// A candidate match from forward geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display name (address or description)
    pub display_name: String,
    /// Location of the match
    pub coordinates: Coordinates,
}

impl SearchResult {
    pub fn new(display_name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            display_name: display_name.into(),
            coordinates,
        }
    }
}

/// Where a resolved address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSource {
    /// Display name returned by the reverse geocoder
    Geocoded,
    /// Formatted coordinate used because the lookup failed or found nothing
    Fallback,
}

/// Outcome of a reverse lookup; always carries a usable address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub address: String,
    pub source: AddressSource,
}

impl ResolvedAddress {
    pub fn geocoded(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            source: AddressSource::Geocoded,
        }
    }

    pub fn fallback(coords: Coordinates) -> Self {
        Self {
            address: coords.to_address(),
            source: AddressSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == AddressSource::Fallback
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Backend name (used in config/API)
    fn name(&self) -> &'static str;

    /// Search for locations matching free text, best match first
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchResult>>> + Send;

    /// Reverse geocode coordinates to a display name
    ///
    /// `Ok(None)` means the service answered but knows no address there.
    fn reverse(&self, coords: Coordinates) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Information about a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name (used in config/API)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// List all available geocoding backends
pub fn available_backends() -> Vec<BackendInfo> {
    vec![
        BackendInfo {
            name: "nominatim".to_string(),
            description: "OpenStreetMap Nominatim web service".to_string(),
        },
        BackendInfo {
            name: "offline".to_string(),
            description: "No network access; addresses fall back to coordinates".to_string(),
        },
    ]
}

/// Backend selected by name from configuration
#[derive(Debug, Clone)]
pub enum Geocoder {
    Nominatim(nominatim::NominatimBackend),
    Offline(offline::OfflineBackend),
}

impl GeoBackend for Geocoder {
    fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(b) => b.name(),
            Self::Offline(b) => b.name(),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        match self {
            Self::Nominatim(b) => b.search(query).await,
            Self::Offline(b) => b.search(query).await,
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        match self {
            Self::Nominatim(b) => b.reverse(coords).await,
            Self::Offline(b) => b.reverse(coords).await,
        }
    }
}

/// Build the backend named in the geocoding configuration
pub fn get_geocoder(config: &GeocodingConfig) -> Result<Geocoder> {
    match config.backend.to_lowercase().as_str() {
        "nominatim" => Ok(Geocoder::Nominatim(nominatim::NominatimBackend::new(config)?)),
        "offline" => Ok(Geocoder::Offline(offline::OfflineBackend)),
        other => Err(Error::Config(format!("Unknown geocoding backend: {}", other))),
    }
}

/// Geocoding client with the caller-facing contract
///
/// Blank queries never reach the backend, every call is bounded by a
/// timeout, and reverse lookups always resolve to some address.
#[derive(Debug, Clone)]
pub struct GeocodingClient<B = Geocoder> {
    backend: B,
    timeout: Duration,
}

impl GeocodingClient<Geocoder> {
    /// Create a client for the backend named in the configuration
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(Error::Config(
                "geocoding.timeout_secs must be at least 1 second".to_string(),
            ));
        }
        Ok(Self::new(
            get_geocoder(config)?,
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

impl<B: GeoBackend> GeocodingClient<B> {
    pub fn new(backend: B, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve free text to candidate locations
    ///
    /// Returns an empty list for blank input without contacting the backend.
    /// Candidates with out-of-range coordinates are dropped.
    pub async fn forward_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = match tokio::time::timeout(self.timeout, self.backend.search(query)).await {
            Ok(results) => results.map_err(unavailable)?,
            Err(_) => {
                return Err(Error::GeocodingUnavailable(format!(
                    "search for '{}' timed out after {}s",
                    query,
                    self.timeout.as_secs_f64()
                )))
            }
        };

        Ok(results
            .into_iter()
            .filter(|result| {
                let valid = result.coordinates.is_valid();
                if !valid {
                    warn!(
                        "Dropping search result '{}' with out-of-range coordinates",
                        result.display_name
                    );
                }
                valid
            })
            .collect())
    }

    /// Resolve coordinates to a display address
    ///
    /// Never fails: any error, timeout or empty answer yields the formatted
    /// coordinate instead.
    pub async fn reverse_lookup(&self, coords: Coordinates) -> ResolvedAddress {
        if let Err(e) = coords.validate() {
            warn!("Skipping reverse lookup: {}", e);
            return ResolvedAddress::fallback(coords);
        }

        match tokio::time::timeout(self.timeout, self.backend.reverse(coords)).await {
            Ok(Ok(Some(name))) if !name.trim().is_empty() => ResolvedAddress::geocoded(name),
            Ok(Ok(_)) => {
                debug!("No address known at {}, using coordinates", coords);
                ResolvedAddress::fallback(coords)
            }
            Ok(Err(e)) => {
                warn!("Reverse lookup for {} failed: {}", coords, e);
                ResolvedAddress::fallback(coords)
            }
            Err(_) => {
                warn!(
                    "Reverse lookup for {} timed out after {}s",
                    coords,
                    self.timeout.as_secs_f64()
                );
                ResolvedAddress::fallback(coords)
            }
        }
    }
}

fn unavailable(err: Error) -> Error {
    match err {
        Error::GeocodingUnavailable(_) => err,
        other => Error::GeocodingUnavailable(other.to_string()),
    }
}
