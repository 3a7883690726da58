//! The reporting screen
//!
//! Two sections (issue report, community event), one of which is active,
//! sharing a single map modal and a single address search box.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::form::{EventForm, FormKind, IssueForm, Receipt, SubmissionSink};
use crate::geo::{GeoBackend, GeocodingClient, ResolvedAddress, SearchResult};
use crate::location::{ClickTarget, LocationField, LookupTicket, MapModal, SearchBox};
use tracing::debug;

/// State of one open reporting screen
#[derive(Debug)]
pub struct Session {
    active: FormKind,
    issue: IssueForm,
    event: EventForm,
    modal: MapModal,
    search: SearchBox,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            active: FormKind::Issue,
            issue: IssueForm::new(),
            event: EventForm::new(config.forms),
            modal: MapModal::new(config.map.clone()),
            search: SearchBox::new(),
        }
    }

    pub fn active(&self) -> FormKind {
        self.active
    }

    /// Show another section
    ///
    /// In-progress values of both forms are kept; an open map picker and the
    /// search box belong to the section being left and are closed.
    pub fn switch_to(&mut self, kind: FormKind) {
        if kind == self.active {
            return;
        }
        self.location_mut(self.active).close_map_picker();
        self.search.clear();
        debug!("Switching from the {} form to the {} form", self.active, kind);
        self.active = kind;
    }

    pub fn issue(&self) -> &IssueForm {
        &self.issue
    }

    pub fn issue_mut(&mut self) -> &mut IssueForm {
        &mut self.issue
    }

    pub fn event(&self) -> &EventForm {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut EventForm {
        &mut self.event
    }

    pub fn modal(&self) -> &MapModal {
        &self.modal
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search
    }

    pub fn search_box_mut(&mut self) -> &mut SearchBox {
        &mut self.search
    }

    pub fn location(&self, kind: FormKind) -> &LocationField {
        match kind {
            FormKind::Issue => self.issue.location(),
            FormKind::Event => self.event.location(),
        }
    }

    pub fn location_mut(&mut self, kind: FormKind) -> &mut LocationField {
        match kind {
            FormKind::Issue => self.issue.location_mut(),
            FormKind::Event => self.event.location_mut(),
        }
    }

    /// Open the map picker for the active section
    pub fn open_map_picker(&mut self) -> Result<()> {
        let modal = self.modal.clone();
        self.location_mut(self.active).open_map_picker(&modal)
    }

    /// Close the map picker without picking
    pub fn cancel_map_picker(&mut self) {
        self.location_mut(self.active).close_map_picker();
    }

    /// Forward a click on the open picker to the active location field
    ///
    /// Returns the ticket of the reverse lookup to run, or `None` when the
    /// click did not pick anything.
    pub fn click_map(
        &mut self,
        target: ClickTarget,
        coords: Coordinates,
    ) -> Result<Option<LookupTicket>> {
        let field = self.location_mut(self.active);
        let picked = match field.picker_mut() {
            Some(lease) => lease.picker_mut().click(target, coords),
            None => return Err(Error::Location("the map picker is not open".to_string())),
        };

        match picked {
            Some(coords) => field.on_map_pick(coords).map(Some),
            None => Ok(None),
        }
    }

    /// Deliver a reverse lookup result to the form that issued it
    pub fn complete_lookup(
        &mut self,
        kind: FormKind,
        ticket: LookupTicket,
        resolved: ResolvedAddress,
    ) -> bool {
        self.location_mut(kind).complete_lookup(ticket, resolved)
    }

    /// Click the map and resolve the picked point in one step
    pub async fn pick_on_map<B: GeoBackend>(
        &mut self,
        target: ClickTarget,
        coords: Coordinates,
        client: &GeocodingClient<B>,
    ) -> Result<Option<String>> {
        let kind = self.active;
        let Some(ticket) = self.click_map(target, coords)? else {
            return Ok(None);
        };
        let resolved = client.reverse_lookup(ticket.coordinates()).await;
        self.complete_lookup(kind, ticket, resolved);
        Ok(Some(self.location(kind).current_value()))
    }

    /// Run an address search in the shared search box
    pub async fn search<B: GeoBackend>(
        &mut self,
        text: &str,
        client: &GeocodingClient<B>,
    ) -> &[SearchResult] {
        self.search.search(text, client).await
    }

    /// Use the search result at `index` as the active section's location
    pub fn select_search_result(&mut self, index: usize) -> Result<()> {
        let result = self
            .search
            .result(index)
            .cloned()
            .ok_or_else(|| Error::Location(format!("no search result at position {}", index)))?;
        self.location_mut(self.active).apply_search_result(&result)
    }

    /// Submit the active section
    pub fn submit_active(&mut self, sink: &dyn SubmissionSink) -> Result<Receipt> {
        let receipt = match self.active {
            FormKind::Issue => self.issue.submit(sink)?,
            FormKind::Event => self.event.submit(sink)?,
        };
        self.search.clear();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::submit::testing::RecordingSink;
    use crate::geo::testing::{Reply, StubBackend};
    use crate::location::{LocationMode, LookupState};
    use std::time::Duration;

    fn session() -> Session {
        Session::new(&Config::default())
    }

    fn stub_client(name: Option<&str>) -> GeocodingClient<StubBackend> {
        let reverse = match name {
            Some(name) => Reply::Value(Some(name.to_string())),
            None => Reply::Fail,
        };
        GeocodingClient::new(
            StubBackend::new(
                Reply::Value(vec![SearchResult::new(
                    "Hlavné námestie, Bratislava",
                    Coordinates::new(48.1437, 17.1088),
                )]),
                reverse,
            ),
            Duration::from_millis(50),
        )
    }

    #[test]
    fn test_starts_on_issue_form() {
        let session = session();
        assert_eq!(session.active(), FormKind::Issue);
        assert!(!session.modal().is_open());
    }

    #[test]
    fn test_switching_preserves_values() {
        let mut session = session();
        session.issue_mut().set_subject("Pothole");
        session.issue_mut().location_mut().set_manual_text("Main St").unwrap();

        session.switch_to(FormKind::Event);
        session.event_mut().set_details("Cleanup");
        session.switch_to(FormKind::Issue);

        assert_eq!(session.issue().subject(), "Pothole");
        assert_eq!(session.issue().location().manual_text(), "Main St");
        assert_eq!(session.event().details(), "Cleanup");
    }

    #[test]
    fn test_switching_closes_picker() {
        let mut session = session();
        session.open_map_picker().unwrap();
        assert_eq!(session.modal().owner(), Some(FormKind::Issue));

        session.switch_to(FormKind::Event);
        assert!(!session.modal().is_open());

        session.open_map_picker().unwrap();
        assert_eq!(session.modal().owner(), Some(FormKind::Event));
    }

    #[test]
    fn test_click_requires_open_picker() {
        let mut session = session();
        let err = session
            .click_map(ClickTarget::Map, Coordinates::new(48.0, 17.0))
            .unwrap_err();
        assert!(matches!(err, Error::Location(_)));
    }

    #[test]
    fn test_overlay_click_picks_nothing() {
        let mut session = session();
        session.open_map_picker().unwrap();
        let ticket = session
            .click_map(ClickTarget::Overlay, Coordinates::new(48.0, 17.0))
            .unwrap();
        assert!(ticket.is_none());
        assert!(session.issue().location().map_selection().is_none());
        assert!(session.modal().is_open());
    }

    #[test]
    fn test_out_of_order_lookups_keep_latest_pick() {
        let mut session = session();
        session.open_map_picker().unwrap();

        let a = session
            .click_map(ClickTarget::Map, Coordinates::new(48.10, 17.10))
            .unwrap()
            .unwrap();
        let b = session
            .click_map(ClickTarget::Map, Coordinates::new(48.20, 17.20))
            .unwrap()
            .unwrap();

        assert!(session.complete_lookup(FormKind::Issue, b, ResolvedAddress::geocoded("B street")));
        assert!(!session.complete_lookup(FormKind::Issue, a, ResolvedAddress::geocoded("A street")));

        assert_eq!(session.issue().location().current_value(), "B street");
        assert!(!session.modal().is_open());
    }

    #[tokio::test]
    async fn test_pick_on_map_resolves_address() {
        let mut session = session();
        let client = stub_client(Some("Obchodná 5, Bratislava"));
        session.open_map_picker().unwrap();

        let value = session
            .pick_on_map(ClickTarget::Map, Coordinates::new(48.1482, 17.1067), &client)
            .await
            .unwrap();

        assert_eq!(value.as_deref(), Some("Obchodná 5, Bratislava"));
        assert_eq!(session.issue().location().mode(), LocationMode::Map);
        assert!(!session.modal().is_open());
    }

    #[tokio::test]
    async fn test_pick_on_map_falls_back_when_geocoder_fails() {
        let mut session = session();
        let client = stub_client(None);
        session.open_map_picker().unwrap();

        let value = session
            .pick_on_map(ClickTarget::Map, Coordinates::new(48.14820, 17.10670), &client)
            .await
            .unwrap();

        assert_eq!(value.as_deref(), Some("48.14820, 17.10670"));
        assert_eq!(session.issue().location().lookup_state(), LookupState::Fallback);
    }

    #[tokio::test]
    async fn test_search_and_select_result() {
        let mut session = session();
        let client = stub_client(None);
        session.switch_to(FormKind::Event);
        session.open_map_picker().unwrap();

        assert_eq!(session.search("námestie", &client).await.len(), 1);
        session.select_search_result(0).unwrap();

        let field = session.event().location();
        assert_eq!(field.current_value(), "Hlavné námestie, Bratislava");
        assert_eq!(field.map_selection(), Some(Coordinates::new(48.1437, 17.1088)));
        assert!(!session.modal().is_open());
        assert!(session.select_search_result(5).is_err());
    }

    #[test]
    fn test_submit_resets_only_active_form() {
        let sink = RecordingSink::default();
        let mut session = session();

        session.event_mut().set_details("Park cleanup");
        session.event_mut().location_mut().set_manual_text("Park").unwrap();

        session.issue_mut().set_subject("Pothole");
        session.issue_mut().set_details("Deep pothole");
        session.issue_mut().location_mut().set_manual_text("Main St").unwrap();

        session.submit_active(&sink).unwrap();

        assert_eq!(sink.count(), 1);
        assert_eq!(session.issue().subject(), "");
        assert_eq!(session.issue().location().manual_text(), "");
        assert_eq!(session.event().details(), "Park cleanup");
        assert_eq!(session.event().location().manual_text(), "Park");
    }
}
