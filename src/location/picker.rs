//! Map picker surface and the process-wide map modal
//!
//! The picker is passive: it reports clicks and draws one marker. Which form
//! a pick belongs to is decided by whoever holds the `PickerLease`.

use crate::config::MapConfig;
use crate::constants::api::OSM_TILE_SUBDOMAINS;
use crate::constants::geo::MAX_ZOOM;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::form::FormKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Where on the picker a click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The map itself
    Map,
    /// Chrome drawn over the map (search box, buttons)
    Overlay,
}

/// Interactive map view with at most one marker
#[derive(Debug, Clone, PartialEq)]
pub struct MapPicker {
    center: Coordinates,
    zoom: u8,
    marker: Option<Coordinates>,
    tile_url: String,
}

impl MapPicker {
    /// Create a picker at the configured default view
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: config.center(),
            zoom: config.zoom.min(MAX_ZOOM),
            marker: None,
            tile_url: config.tile_url.clone(),
        }
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.min(MAX_ZOOM);
    }

    /// Handle a click, returning the picked coordinate for map clicks
    ///
    /// Moves the marker but leaves the view where the user put it.
    pub fn click(&mut self, target: ClickTarget, coords: Coordinates) -> Option<Coordinates> {
        if target == ClickTarget::Overlay {
            return None;
        }
        if let Err(e) = coords.validate() {
            warn!("Ignoring map click: {}", e);
            return None;
        }
        self.marker = Some(coords);
        Some(coords)
    }

    /// Place the marker from code (e.g. a search result) and re-center on it
    pub fn set_coordinate(&mut self, coords: Coordinates) {
        self.marker = Some(coords);
        self.center = coords;
    }

    /// Concrete URL for one tile of the configured template
    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> String {
        let subdomain = OSM_TILE_SUBDOMAINS[((x as usize) + (y as usize)) % OSM_TILE_SUBDOMAINS.len()];
        self.tile_url
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

type Slot = Arc<Mutex<Option<FormKind>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<FormKind>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single map modal shared by every form on the screen
///
/// Cloning shares the same modal.
#[derive(Debug, Clone)]
pub struct MapModal {
    slot: Slot,
    config: MapConfig,
}

impl MapModal {
    pub fn new(config: MapConfig) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            config,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Form currently holding the modal, if any
    pub fn owner(&self) -> Option<FormKind> {
        *lock(&self.slot)
    }

    pub fn is_open(&self) -> bool {
        self.owner().is_some()
    }

    /// Open the picker for `owner`
    ///
    /// Fails while another lease is alive. A previous selection is shown as
    /// the marker and the view centers on it.
    pub fn open(&self, owner: FormKind, previous: Option<Coordinates>) -> Result<PickerLease> {
        let mut slot = lock(&self.slot);
        if let Some(current) = *slot {
            return Err(Error::PickerBusy(current.to_string()));
        }
        *slot = Some(owner);
        drop(slot);

        let mut picker = MapPicker::new(&self.config);
        if let Some(coords) = previous {
            picker.set_coordinate(coords);
        }

        debug!("Map picker opened for the {} form", owner);
        Ok(PickerLease {
            owner,
            picker,
            slot: Arc::clone(&self.slot),
        })
    }
}

/// Scoped ownership of the map modal; dropping it closes the modal
#[derive(Debug)]
pub struct PickerLease {
    owner: FormKind,
    picker: MapPicker,
    slot: Slot,
}

impl PickerLease {
    pub fn owner(&self) -> FormKind {
        self.owner
    }

    pub fn picker(&self) -> &MapPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut MapPicker {
        &mut self.picker
    }
}

impl Drop for PickerLease {
    fn drop(&mut self) {
        *lock(&self.slot) = None;
        debug!("Map picker closed for the {} form", self.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> MapPicker {
        MapPicker::new(&MapConfig::default())
    }

    #[test]
    fn test_starts_at_default_view() {
        let picker = picker();
        assert_eq!(picker.center(), Coordinates::new(48.1486, 17.1077));
        assert_eq!(picker.zoom(), 13);
        assert!(picker.marker().is_none());
    }

    #[test]
    fn test_map_click_moves_marker_not_view() {
        let mut picker = picker();
        let clicked = Coordinates::new(48.15, 17.12);

        assert_eq!(picker.click(ClickTarget::Map, clicked), Some(clicked));
        assert_eq!(picker.marker(), Some(clicked));
        assert_eq!(picker.center(), Coordinates::new(48.1486, 17.1077));
    }

    #[test]
    fn test_overlay_click_is_ignored() {
        let mut picker = picker();
        assert_eq!(picker.click(ClickTarget::Overlay, Coordinates::new(48.0, 17.0)), None);
        assert!(picker.marker().is_none());
    }

    #[test]
    fn test_single_marker_follows_latest_pick() {
        let mut picker = picker();
        picker.click(ClickTarget::Map, Coordinates::new(48.0, 17.0));
        picker.click(ClickTarget::Map, Coordinates::new(48.2, 17.2));
        assert_eq!(picker.marker(), Some(Coordinates::new(48.2, 17.2)));
    }

    #[test]
    fn test_set_coordinate_recenters() {
        let mut picker = picker();
        let target = Coordinates::new(48.7164, 21.2611);
        picker.set_coordinate(target);
        assert_eq!(picker.center(), target);
        assert_eq!(picker.marker(), Some(target));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut picker = picker();
        picker.set_zoom(30);
        assert_eq!(picker.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_tile_url() {
        let picker = picker();
        assert_eq!(
            picker.tile_url(4, 5, 13),
            "https://a.tile.openstreetmap.org/13/4/5.png"
        );
        assert_eq!(
            picker.tile_url(1, 0, 1),
            "https://b.tile.openstreetmap.org/1/1/0.png"
        );
    }

    #[test]
    fn test_modal_allows_one_lease() {
        let modal = MapModal::new(MapConfig::default());
        let lease = modal.open(FormKind::Issue, None).unwrap();
        assert_eq!(modal.owner(), Some(FormKind::Issue));

        let err = modal.open(FormKind::Event, None).unwrap_err();
        assert!(matches!(err, Error::PickerBusy(_)));

        drop(lease);
        assert!(!modal.is_open());
        assert!(modal.open(FormKind::Event, None).is_ok());
    }

    #[test]
    fn test_clones_share_the_modal() {
        let modal = MapModal::new(MapConfig::default());
        let other = modal.clone();
        let _lease = modal.open(FormKind::Event, None).unwrap();
        assert_eq!(other.owner(), Some(FormKind::Event));
    }

    #[test]
    fn test_open_shows_previous_selection() {
        let modal = MapModal::new(MapConfig::default());
        let previous = Coordinates::new(48.3, 17.5);
        let lease = modal.open(FormKind::Issue, Some(previous)).unwrap();
        assert_eq!(lease.picker().marker(), Some(previous));
        assert_eq!(lease.picker().center(), previous);
    }
}
