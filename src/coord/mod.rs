//! Geographic coordinates
//!
//! The value produced by a map click or a geocoding search result, and the
//! fixed-precision text that stands in for an address when no reverse
//! lookup result is available.

use crate::constants::geo::COORDINATE_DISPLAY_PRECISION;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Whether both components are within range
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Format as a `"lat, lng"` address stand-in with five decimal places
    pub fn to_address(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.prec$}, {:.prec$}",
            self.lat,
            self.lng,
            prec = COORDINATE_DISPLAY_PRECISION
        )
    }
}
