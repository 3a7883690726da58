//! community-guard: civic issue reports and community events
//!
//! A library and CLI tool for filling in the two reporting forms of a
//! community-guard screen: reporting a civic issue and announcing a
//! community event.
//!
//! ## Features
//!
//! - Location fields that take either a typed address or a map pick
//! - A single shared map picker modal
//! - Forward and reverse geocoding (Nominatim) with coordinate fallback
//! - Stale geocoding responses are discarded
//! - Field-level validation and pluggable submission sinks
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use community_guard::form::AcknowledgeSink;
//! use community_guard::geo::GeocodingClient;
//! use community_guard::location::ClickTarget;
//! use community_guard::{Config, Coordinates, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> community_guard::Result<()> {
//! let mut config = Config::default();
//! config.geocoding.backend = "offline".to_string();
//! let client = GeocodingClient::from_config(&config.geocoding)?;
//!
//! let mut session = Session::new(&config);
//! session.issue_mut().set_subject("Pothole");
//! session.issue_mut().set_details("Deep pothole on the corner");
//!
//! // Pick the location on the map; without an address the coordinate is used
//! session.open_map_picker()?;
//! let address = session
//!     .pick_on_map(ClickTarget::Map, Coordinates::new(48.1482, 17.1067), &client)
//!     .await?;
//! assert_eq!(address.as_deref(), Some("48.14820, 17.10670"));
//!
//! let receipt = session.submit_active(&AcknowledgeSink)?;
//! println!("{}", receipt.message);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod form;
pub mod format;
pub mod geo;
pub mod location;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use form::{EventForm, FormKind, IssueForm, Receipt, SubmissionSink};
pub use geo::{GeocodingClient, ResolvedAddress, SearchResult};
pub use location::{LocationField, LocationMode, LocationSelection};
pub use session::Session;
