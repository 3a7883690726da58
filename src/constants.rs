//! Centralized constants for the community-guard crate
//!
//! Values shared by the geocoding layer, the map picker and the forms.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// OpenStreetMap raster tiles
    pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

    /// Tile server subdomains substituted for `{s}`
    pub const OSM_TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];
}

/// Geographic constants
pub mod geo {
    /// Decimal places used when a coordinate stands in for an address
    pub const COORDINATE_DISPLAY_PRECISION: usize = 5;

    /// Highest zoom level served by standard tile servers
    pub const MAX_ZOOM: u8 = 19;
}

/// User-facing text in the single supported locale (Slovak)
pub mod locale {
    /// `Accept-Language` sent to the geocoder
    pub const LANGUAGE: &str = "sk";

    /// Acknowledgment shown after an issue report is handed off
    pub const ISSUE_ACKNOWLEDGMENT: &str =
        "Ďakujeme za nahlásenie problému. Spolu to dáme do poriadku! 💪";

    /// Acknowledgment shown after a community event is handed off
    pub const EVENT_ACKNOWLEDGMENT: &str =
        "Ďakujeme! Vaša komunitná akcia bola vytvorená. Vidíme sa tam! 💪";

    /// Shown in the search box when a search produced nothing
    pub const NO_RESULTS: &str = "Žiadne výsledky";
}
