//! Address search box
//!
//! Holds the search text and the latest candidates. A response is applied
//! only if the box still holds the query it was issued for.

use crate::constants::locale::NO_RESULTS;
use crate::error::Result;
use crate::geo::{GeoBackend, GeocodingClient, SearchResult};
use tracing::{debug, warn};

/// Identifies one forward search by its query text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What the search box is currently showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Results,
    NoResults,
}

/// Search box state
#[derive(Debug, Default)]
pub struct SearchBox {
    text: String,
    results: Vec<SearchResult>,
    status: SearchStatus,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; a search still running for the old text no longer
    /// counts as in progress
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text && self.status == SearchStatus::Searching {
            self.status = SearchStatus::Idle;
        }
        self.text = text;
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn result(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Message to show under the box, if any
    pub fn message(&self) -> Option<&'static str> {
        (self.status == SearchStatus::NoResults).then_some(NO_RESULTS)
    }

    /// Start a search for the current text
    ///
    /// Blank text clears the results and issues nothing.
    pub fn begin(&mut self) -> Option<SearchTicket> {
        if self.text.trim().is_empty() {
            self.results.clear();
            self.status = SearchStatus::Idle;
            return None;
        }
        self.status = SearchStatus::Searching;
        Some(SearchTicket {
            query: self.text.clone(),
        })
    }

    /// Apply a search response
    ///
    /// Returns false when the text changed since `ticket` was issued. A
    /// failed search shows as "no results".
    pub fn complete(&mut self, ticket: &SearchTicket, outcome: Result<Vec<SearchResult>>) -> bool {
        if ticket.query != self.text {
            debug!(
                "Discarding results for '{}', box now holds '{}'",
                ticket.query, self.text
            );
            return false;
        }

        self.results = match outcome {
            Ok(results) => results,
            Err(e) => {
                warn!("Search for '{}' failed: {}", ticket.query, e);
                Vec::new()
            }
        };
        self.status = if self.results.is_empty() {
            SearchStatus::NoResults
        } else {
            SearchStatus::Results
        };
        true
    }

    /// Set the text and run the search to completion
    pub async fn search<B: GeoBackend>(
        &mut self,
        text: impl Into<String>,
        client: &GeocodingClient<B>,
    ) -> &[SearchResult] {
        self.set_text(text);
        if let Some(ticket) = self.begin() {
            let outcome = client.forward_search(ticket.query()).await;
            self.complete(&ticket, outcome);
        }
        &self.results
    }

    /// Forget text and results
    pub fn clear(&mut self) {
        self.text.clear();
        self.results.clear();
        self.status = SearchStatus::Idle;
    }
}
