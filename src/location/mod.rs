//! Location selection
//!
//! This module handles:
//! - The map picker surface and the single shared map modal
//! - The per-form location field (typed address vs. map pick)
//! - The address search box and its stale-response handling

pub mod field;
pub mod picker;
pub mod search;

pub use field::{LocationField, LookupState, LookupTicket};
pub use picker::{ClickTarget, MapModal, MapPicker, PickerLease};
pub use search::{SearchBox, SearchStatus, SearchTicket};

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};

/// Which input currently drives a location field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// Address typed by the user
    #[default]
    Manual,
    /// Point picked on the map or chosen from search results
    Map,
}

impl LocationMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Map,
            Self::Map => Self::Manual,
        }
    }
}

impl std::fmt::Display for LocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// The resolved value bound to a form's location field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationSelection {
    Manual {
        address: String,
    },
    MapPicked {
        coordinates: Coordinates,
        address: String,
    },
}

impl LocationSelection {
    pub fn address(&self) -> &str {
        match self {
            Self::Manual { address } | Self::MapPicked { address, .. } => address,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Manual { .. } => None,
            Self::MapPicked { coordinates, .. } => Some(*coordinates),
        }
    }
}
