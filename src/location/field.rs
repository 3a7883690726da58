//! Location field controller
//!
//! Mediates one form's location between the typed address, the map picker
//! and reverse geocoding. Each mode remembers its own last value; switching
//! mode only changes which one is authoritative.
//!
//! Reverse lookups run through an explicit state machine
//! (idle -> pending -> resolved | fallback). Every pick issues a fresh
//! `LookupTicket`, and a completion is applied only while its ticket is the
//! pending one, so a slow answer for an older pick can never overwrite a
//! newer selection.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::form::FormKind;
use crate::geo::{GeoBackend, GeocodingClient, ResolvedAddress, SearchResult};
use crate::location::picker::{ClickTarget, MapModal, PickerLease};
use crate::location::{LocationMode, LocationSelection};
use tracing::debug;

/// Identifies one reverse lookup issued for a map pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTicket {
    seq: u64,
    coordinates: Coordinates,
}

impl LookupTicket {
    /// Coordinate the lookup was issued for
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// Reverse lookup progress for the current map selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupState {
    Idle,
    Pending(LookupTicket),
    Resolved,
    Fallback,
}

/// Location field of a single form
#[derive(Debug)]
pub struct LocationField {
    owner: FormKind,
    mode: LocationMode,
    manual_text: String,
    map_selection: Option<Coordinates>,
    resolved_address: Option<String>,
    lookup: LookupState,
    next_seq: u64,
    picker: Option<PickerLease>,
}

impl LocationField {
    pub fn new(owner: FormKind) -> Self {
        Self {
            owner,
            mode: LocationMode::Manual,
            manual_text: String::new(),
            map_selection: None,
            resolved_address: None,
            lookup: LookupState::Idle,
            next_seq: 0,
            picker: None,
        }
    }

    pub fn owner(&self) -> FormKind {
        self.owner
    }

    pub fn mode(&self) -> LocationMode {
        self.mode
    }

    pub fn manual_text(&self) -> &str {
        &self.manual_text
    }

    pub fn map_selection(&self) -> Option<Coordinates> {
        self.map_selection
    }

    pub fn resolved_address(&self) -> Option<&str> {
        self.resolved_address.as_deref()
    }

    pub fn lookup_state(&self) -> LookupState {
        self.lookup
    }

    /// Store typed text verbatim; only allowed in manual mode
    pub fn set_manual_text(&mut self, text: impl Into<String>) -> Result<()> {
        if self.mode != LocationMode::Manual {
            return Err(Error::Location(
                "the address can only be typed in manual mode".to_string(),
            ));
        }
        self.manual_text = text.into();
        Ok(())
    }

    /// Flip between manual and map input, keeping both values
    ///
    /// Leaving map mode closes the picker if it is open.
    pub fn toggle_mode(&mut self) -> LocationMode {
        self.mode = self.mode.toggled();
        if self.mode == LocationMode::Manual {
            self.close_map_picker();
        }
        self.mode
    }

    /// Switch to `mode` if not already there
    pub fn set_mode(&mut self, mode: LocationMode) {
        if self.mode != mode {
            self.toggle_mode();
        }
    }

    /// Acquire the shared map modal for this field
    pub fn open_map_picker(&mut self, modal: &MapModal) -> Result<()> {
        if self.picker.is_some() {
            return Ok(());
        }
        self.picker = Some(modal.open(self.owner, self.map_selection)?);
        Ok(())
    }

    /// Close the picker without changing the selection
    pub fn close_map_picker(&mut self) {
        self.picker = None;
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker.is_some()
    }

    pub fn picker(&self) -> Option<&PickerLease> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut PickerLease> {
        self.picker.as_mut()
    }

    /// Record a map pick and start its reverse lookup
    ///
    /// Until the returned ticket completes, the field shows the formatted
    /// coordinate. Any earlier pending lookup becomes stale.
    pub fn on_map_pick(&mut self, coords: Coordinates) -> Result<LookupTicket> {
        coords.validate()?;

        self.next_seq += 1;
        let ticket = LookupTicket {
            seq: self.next_seq,
            coordinates: coords,
        };

        self.mode = LocationMode::Map;
        self.map_selection = Some(coords);
        self.resolved_address = None;
        self.lookup = LookupState::Pending(ticket);

        if let Some(lease) = self.picker.as_mut() {
            let picker = lease.picker_mut();
            if picker.marker() != Some(coords) {
                picker.click(ClickTarget::Map, coords);
            }
        }

        Ok(ticket)
    }

    /// Apply a finished reverse lookup
    ///
    /// Returns false and changes nothing when `ticket` is not the pending
    /// lookup for the current selection. On success the picker closes.
    pub fn complete_lookup(&mut self, ticket: LookupTicket, resolved: ResolvedAddress) -> bool {
        let current = match self.lookup {
            LookupState::Pending(pending) => pending,
            _ => {
                debug!("Discarding lookup result with no lookup pending");
                return false;
            }
        };

        if current != ticket || self.map_selection != Some(ticket.coordinates) {
            debug!(
                "Discarding stale lookup for {} (current pick is {:?})",
                ticket.coordinates, self.map_selection
            );
            return false;
        }

        self.lookup = if resolved.is_fallback() {
            LookupState::Fallback
        } else {
            LookupState::Resolved
        };
        self.resolved_address = Some(resolved.address);
        self.close_map_picker();
        true
    }

    /// Pick a coordinate and resolve it in one step
    pub async fn pick<B: GeoBackend>(
        &mut self,
        coords: Coordinates,
        client: &GeocodingClient<B>,
    ) -> Result<String> {
        let ticket = self.on_map_pick(coords)?;
        let resolved = client.reverse_lookup(coords).await;
        self.complete_lookup(ticket, resolved);
        Ok(self.current_value())
    }

    /// Use a forward search result as the map selection
    ///
    /// The result's display name becomes the address without a reverse
    /// lookup; the picker re-centers on it and closes.
    pub fn apply_search_result(&mut self, result: &SearchResult) -> Result<()> {
        result.coordinates.validate()?;

        self.mode = LocationMode::Map;
        self.map_selection = Some(result.coordinates);
        self.resolved_address = Some(result.display_name.clone());
        self.lookup = LookupState::Resolved;

        if let Some(lease) = self.picker.as_mut() {
            lease.picker_mut().set_coordinate(result.coordinates);
        }
        self.close_map_picker();
        Ok(())
    }

    /// Address the field currently shows
    ///
    /// In map mode this is the resolved address, or the formatted coordinate
    /// while the lookup is outstanding. Empty when nothing was entered.
    pub fn current_value(&self) -> String {
        match self.mode {
            LocationMode::Manual => self.manual_text.clone(),
            LocationMode::Map => match (&self.resolved_address, self.map_selection) {
                (Some(address), _) => address.clone(),
                (None, Some(coords)) => coords.to_address(),
                (None, None) => String::new(),
            },
        }
    }

    /// The authoritative selection, if the active mode has a value
    pub fn selection(&self) -> Option<LocationSelection> {
        match self.mode {
            LocationMode::Manual => {
                let address = self.manual_text.trim();
                (!address.is_empty()).then(|| LocationSelection::Manual {
                    address: address.to_string(),
                })
            }
            LocationMode::Map => self.map_selection.map(|coordinates| LocationSelection::MapPicked {
                coordinates,
                address: self.current_value(),
            }),
        }
    }

    /// Return to the initial empty state, closing the picker
    pub fn reset(&mut self) {
        self.mode = LocationMode::Manual;
        self.manual_text.clear();
        self.map_selection = None;
        self.resolved_address = None;
        self.lookup = LookupState::Idle;
        self.close_map_picker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::geo::testing::{Reply, StubBackend};
    use std::time::Duration;

    fn field() -> LocationField {
        LocationField::new(FormKind::Issue)
    }

    #[test]
    fn test_initial_state() {
        let field = field();
        assert_eq!(field.mode(), LocationMode::Manual);
        assert_eq!(field.manual_text(), "");
        assert!(field.map_selection().is_none());
        assert!(field.resolved_address().is_none());
        assert_eq!(field.lookup_state(), LookupState::Idle);
        assert_eq!(field.current_value(), "");
        assert!(field.selection().is_none());
    }

    #[test]
    fn test_manual_text_is_verbatim() {
        let mut field = field();
        field.set_manual_text("  Main St 4 ").unwrap();
        assert_eq!(field.manual_text(), "  Main St 4 ");
        assert_eq!(field.current_value(), "  Main St 4 ");
        assert_eq!(
            field.selection(),
            Some(LocationSelection::Manual {
                address: "Main St 4".to_string()
            })
        );
    }

    #[test]
    fn test_manual_text_rejected_in_map_mode() {
        let mut field = field();
        field.toggle_mode();
        assert!(matches!(field.set_manual_text("x"), Err(Error::Location(_))));
    }

    #[test]
    fn test_toggle_round_trip_restores_typed_text() {
        let mut field = field();
        field.set_manual_text("Main St").unwrap();

        assert_eq!(field.toggle_mode(), LocationMode::Map);
        assert_eq!(field.current_value(), "");
        assert_eq!(field.toggle_mode(), LocationMode::Manual);

        assert_eq!(field.manual_text(), "Main St");
        assert_eq!(field.current_value(), "Main St");
    }

    #[test]
    fn test_toggle_keeps_map_value() {
        let mut field = field();
        field.set_manual_text("Main St").unwrap();
        let ticket = field.on_map_pick(Coordinates::new(48.1, 17.1)).unwrap();
        field.complete_lookup(ticket, ResolvedAddress::geocoded("Obchodná 1"));

        field.toggle_mode();
        assert_eq!(field.current_value(), "Main St");
        field.toggle_mode();
        assert_eq!(field.current_value(), "Obchodná 1");
    }

    #[test]
    fn test_pick_shows_provisional_coordinate() {
        let mut field = field();
        let ticket = field.on_map_pick(Coordinates::new(48.1482, 17.1067)).unwrap();

        assert_eq!(field.mode(), LocationMode::Map);
        assert_eq!(field.lookup_state(), LookupState::Pending(ticket));
        assert_eq!(field.current_value(), "48.14820, 17.10670");
    }

    #[test]
    fn test_pick_rejects_invalid_coordinates() {
        let mut field = field();
        assert!(field.on_map_pick(Coordinates::new(100.0, 0.0)).is_err());
        assert!(field.map_selection().is_none());
    }

    #[test]
    fn test_completion_closes_picker() {
        let modal = MapModal::new(MapConfig::default());
        let mut field = field();
        field.toggle_mode();
        field.open_map_picker(&modal).unwrap();
        assert!(modal.is_open());

        let ticket = field.on_map_pick(Coordinates::new(48.1, 17.1)).unwrap();
        assert!(field.is_picker_open());
        assert!(field.complete_lookup(ticket, ResolvedAddress::geocoded("Obchodná 1")));

        assert!(!field.is_picker_open());
        assert!(!modal.is_open());
        assert_eq!(field.lookup_state(), LookupState::Resolved);
    }

    #[test]
    fn test_fallback_completion() {
        let mut field = field();
        let coords = Coordinates::new(48.1482, 17.1067);
        let ticket = field.on_map_pick(coords).unwrap();
        assert!(field.complete_lookup(ticket, ResolvedAddress::fallback(coords)));
        assert_eq!(field.lookup_state(), LookupState::Fallback);
        assert_eq!(field.resolved_address(), Some("48.14820, 17.10670"));
    }

    #[test]
    fn test_last_pick_wins_when_stale_completes_last() {
        let mut field = field();
        let a = field.on_map_pick(Coordinates::new(48.0, 17.0)).unwrap();
        let b = field.on_map_pick(Coordinates::new(48.5, 17.5)).unwrap();

        assert!(field.complete_lookup(b, ResolvedAddress::geocoded("Address B")));
        assert!(!field.complete_lookup(a, ResolvedAddress::geocoded("Address A")));

        assert_eq!(field.current_value(), "Address B");
        assert_eq!(field.map_selection(), Some(Coordinates::new(48.5, 17.5)));
    }

    #[test]
    fn test_last_pick_wins_when_stale_completes_first() {
        let mut field = field();
        let a = field.on_map_pick(Coordinates::new(48.0, 17.0)).unwrap();
        let b = field.on_map_pick(Coordinates::new(48.5, 17.5)).unwrap();

        assert!(!field.complete_lookup(a, ResolvedAddress::geocoded("Address A")));
        assert_eq!(field.current_value(), "48.50000, 17.50000");

        assert!(field.complete_lookup(b, ResolvedAddress::geocoded("Address B")));
        assert_eq!(field.current_value(), "Address B");
    }

    #[test]
    fn test_repeat_pick_of_same_point_still_discards_older_ticket() {
        let mut field = field();
        let coords = Coordinates::new(48.0, 17.0);
        let first = field.on_map_pick(coords).unwrap();
        let second = field.on_map_pick(coords).unwrap();

        assert!(!field.complete_lookup(first, ResolvedAddress::geocoded("old")));
        assert!(field.complete_lookup(second, ResolvedAddress::geocoded("new")));
        assert_eq!(field.current_value(), "new");
    }

    #[test]
    fn test_search_result_invalidates_pending_lookup() {
        let modal = MapModal::new(MapConfig::default());
        let mut field = field();
        field.open_map_picker(&modal).unwrap();
        let ticket = field.on_map_pick(Coordinates::new(48.0, 17.0)).unwrap();

        let chosen = SearchResult::new("Hlavné námestie, Bratislava", Coordinates::new(48.1437, 17.1088));
        field.apply_search_result(&chosen).unwrap();

        assert!(!field.complete_lookup(ticket, ResolvedAddress::geocoded("late")));
        assert_eq!(field.current_value(), "Hlavné námestie, Bratislava");
        assert!(!modal.is_open());
        assert_eq!(
            field.selection(),
            Some(LocationSelection::MapPicked {
                coordinates: Coordinates::new(48.1437, 17.1088),
                address: "Hlavné námestie, Bratislava".to_string(),
            })
        );
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let modal = MapModal::new(MapConfig::default());
        let mut field = field();
        field.set_manual_text("Main St").unwrap();
        field.open_map_picker(&modal).unwrap();
        field.on_map_pick(Coordinates::new(48.0, 17.0)).unwrap();

        field.reset();

        assert_eq!(field.mode(), LocationMode::Manual);
        assert_eq!(field.manual_text(), "");
        assert!(field.map_selection().is_none());
        assert!(field.resolved_address().is_none());
        assert_eq!(field.lookup_state(), LookupState::Idle);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_lookup_finishing_after_reset_is_discarded() {
        let mut field = field();
        let coords = Coordinates::new(48.1482, 17.1067);
        let ticket = field.on_map_pick(coords).unwrap();

        field.reset();
        assert!(!field.complete_lookup(ticket, ResolvedAddress::geocoded("late")));
        assert_eq!(field.mode(), LocationMode::Manual);
        assert!(field.resolved_address().is_none());
        assert_eq!(field.current_value(), "");

        // A new pick of the same point does not revive the old ticket
        let fresh = field.on_map_pick(coords).unwrap();
        assert!(!field.complete_lookup(ticket, ResolvedAddress::geocoded("late")));
        assert!(field.complete_lookup(fresh, ResolvedAddress::geocoded("fresh")));
        assert_eq!(field.current_value(), "fresh");
    }

    #[test]
    fn test_leaving_map_mode_closes_picker() {
        let modal = MapModal::new(MapConfig::default());
        let mut field = field();
        field.set_mode(LocationMode::Map);
        field.open_map_picker(&modal).unwrap();
        field.set_mode(LocationMode::Manual);
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_pick_resolves_through_client() {
        let client = GeocodingClient::new(
            StubBackend::new(Reply::Fail, Reply::Value(Some("Obchodná 5".to_string()))),
            Duration::from_millis(50),
        );
        let mut field = field();
        let value = field.pick(Coordinates::new(48.1482, 17.1067), &client).await.unwrap();
        assert_eq!(value, "Obchodná 5");
        assert_eq!(field.lookup_state(), LookupState::Resolved);
    }

    #[tokio::test]
    async fn test_pick_with_failing_geocoder_uses_coordinates() {
        let client = GeocodingClient::new(
            StubBackend::new(Reply::Fail, Reply::Fail),
            Duration::from_millis(50),
        );
        let mut field = field();
        let value = field.pick(Coordinates::new(48.1482, 17.1067), &client).await.unwrap();
        assert_eq!(value, "48.14820, 17.10670");
        assert_eq!(field.lookup_state(), LookupState::Fallback);
    }
}
