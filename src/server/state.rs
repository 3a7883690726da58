//! Server shared state
//!
//! Holds configuration and the geocoding client shared by all requests.

use crate::config::Config;
use crate::error::Result;
use crate::geo::GeocodingClient;

/// Shared state for the HTTP server; read-only once the server starts
pub struct AppState {
    config: Config,
    geocoder: GeocodingClient,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let geocoder = GeocodingClient::from_config(&config.geocoding)?;
        Ok(Self { config, geocoder })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the geocoding client
    pub fn geocoder(&self) -> &GeocodingClient {
        &self.geocoder
    }
}
