//! Offline geocoding backend
//!
//! Never touches the network. Searches find nothing and reverse lookups know
//! no address, so map picks resolve to their formatted coordinates.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::{GeoBackend, SearchResult};

/// Backend that answers every request locally with "nothing found"
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl GeoBackend for OfflineBackend {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }

    async fn reverse(&self, _coords: Coordinates) -> Result<Option<String>> {
        Ok(None)
    }
}
