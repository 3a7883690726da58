//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/community-guard/config.toml

pub mod defaults;

use crate::coord::Coordinates;
use crate::constants::geo::MAX_ZOOM;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Map picker settings
    #[serde(default)]
    pub map: MapConfig,

    /// Form validation policy
    #[serde(default)]
    pub forms: FormsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Backend name: "nominatim" or "offline"
    #[serde(default = "default_geocoder")]
    pub backend: String,

    /// Base URL of the Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language for display names
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of search candidates
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

/// Map picker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial center longitude
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Tile URL template with {s}, {z}, {x} and {y} placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
}

/// Form validation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsConfig {
    /// If true, community events must have an end time
    #[serde(default = "default_event_end_required")]
    pub event_end_required: bool,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_geocoder() -> String {
    DEFAULT_GEOCODER.to_string()
}
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}
fn default_event_end_required() -> bool {
    DEFAULT_EVENT_END_REQUIRED
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            backend: default_geocoder(),
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            language: default_language(),
            search_limit: default_search_limit(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
        }
    }
}

impl MapConfig {
    /// Initial map center
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.center_lat, self.center_lng)
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            event_end_required: default_event_end_required(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "backend"] => Some(self.geocoding.backend.clone()),
            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "user_agent"] => Some(self.geocoding.user_agent.clone()),
            ["geocoding", "language"] => Some(self.geocoding.language.clone()),
            ["geocoding", "search_limit"] => Some(self.geocoding.search_limit.to_string()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),

            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),

            ["forms", "event_end_required"] => Some(self.forms.event_end_required.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "backend"] => {
                self.geocoding.backend = value.to_string();
            }
            ["geocoding", "base_url"] => {
                self.geocoding.base_url = value.to_string();
            }
            ["geocoding", "user_agent"] => {
                self.geocoding.user_agent = value.to_string();
            }
            ["geocoding", "language"] => {
                self.geocoding.language = value.to_string();
            }
            ["geocoding", "search_limit"] => {
                self.geocoding.search_limit = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid search limit value: {}", value))
                })?;
            }
            ["geocoding", "timeout_secs"] => {
                let timeout: u64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
                if timeout == 0 {
                    return Err(Error::Config("Timeout must be at least 1 second".to_string()));
                }
                self.geocoding.timeout_secs = timeout;
            }

            ["map", "center_lat"] => {
                let lat: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
                Coordinates::new(lat, self.map.center_lng).validate()?;
                self.map.center_lat = lat;
            }
            ["map", "center_lng"] => {
                let lng: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
                Coordinates::new(self.map.center_lat, lng).validate()?;
                self.map.center_lng = lng;
            }
            ["map", "zoom"] => {
                let zoom: u8 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
                if zoom > MAX_ZOOM {
                    return Err(Error::Config(format!(
                        "Zoom {} is above the maximum of {}",
                        zoom, MAX_ZOOM
                    )));
                }
                self.map.zoom = zoom;
            }
            ["map", "tile_url"] => {
                self.map.tile_url = value.to_string();
            }

            ["forms", "event_end_required"] => {
                self.forms.event_end_required = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoding.backend",
            "geocoding.base_url",
            "geocoding.user_agent",
            "geocoding.language",
            "geocoding.search_limit",
            "geocoding.timeout_secs",
            "map.center_lat",
            "map.center_lng",
            "map.zoom",
            "map.tile_url",
            "forms.event_end_required",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
