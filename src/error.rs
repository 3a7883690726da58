//! Error types for community-guard

use crate::form::ValidationErrors;
use thiserror::Error;

/// Main error type for community-guard operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geocoding unavailable: {0}")]
    GeocodingUnavailable(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("Map picker is already open for the {0} form")]
    PickerBusy(String),

    #[error("Location field error: {0}")]
    Location(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for community-guard operations
pub type Result<T> = std::result::Result<T, Error>;
