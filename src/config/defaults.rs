//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api::{NOMINATIM_URL, OSM_TILE_URL};
use crate::constants::locale::LANGUAGE;

/// Default geocoding backend
pub const DEFAULT_GEOCODER: &str = "nominatim";

/// Default geocoding service base URL
pub const DEFAULT_GEOCODER_URL: &str = NOMINATIM_URL;

/// User-Agent sent to the geocoding service
pub const DEFAULT_USER_AGENT: &str = concat!("community-guard/", env!("CARGO_PKG_VERSION"));

/// Language requested from the geocoding service
pub const DEFAULT_LANGUAGE: &str = LANGUAGE;

/// Maximum number of forward search candidates
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Geocoding request timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 5;

/// Default map center latitude (Bratislava)
pub const DEFAULT_CENTER_LAT: f64 = 48.1486;

/// Default map center longitude (Bratislava)
pub const DEFAULT_CENTER_LNG: f64 = 17.1077;

/// Default map zoom level
pub const DEFAULT_ZOOM: u8 = 13;

/// Default map tile URL template
pub const DEFAULT_TILE_URL: &str = OSM_TILE_URL;

/// Whether community events need an end time by default
pub const DEFAULT_EVENT_END_REQUIRED: bool = true;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "community-guard";
