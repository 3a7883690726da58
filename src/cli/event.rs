//! Event command handler
//!
//! Fills in and submits the community event form.

use crate::cli::{LocationArgs, OutputArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::{AcknowledgeSink, EventType, FormKind};
use crate::geo::GeocodingClient;
use crate::session::Session;
use clap::Args;
use std::str::FromStr;

/// Event command arguments
#[derive(Args)]
pub struct EventArgs {
    /// Description of the event
    pub details: String,

    /// Event type: cleanup, repair or other
    #[arg(long, short = 't', default_value = "cleanup")]
    pub r#type: String,

    /// Start time, e.g. 2025-06-01T10:00
    #[arg(long, short = 's')]
    pub start: String,

    /// End time, e.g. 2025-06-01T12:00
    #[arg(long, short = 'e')]
    pub end: Option<String>,

    #[command(flatten)]
    pub location: LocationArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the event command
pub async fn run(args: EventArgs) -> Result<()> {
    let config = Config::load()?;
    let formatter = args.output.formatter()?;
    let client = GeocodingClient::from_config(&config.geocoding)?;

    let event_type = EventType::from_str(&args.r#type).map_err(Error::Config)?;

    let mut session = Session::new(&config);
    session.switch_to(FormKind::Event);

    let form = session.event_mut();
    form.set_event_type(event_type);
    form.set_details(args.details);
    form.set_start_time(args.start);
    if let Some(end) = args.end {
        form.set_end_time(end);
    }

    args.location.fill(&mut session, &client).await?;

    let receipt = session.submit_active(&AcknowledgeSink)?;
    let output = formatter.format_receipt(&receipt)?;
    args.output.emit(&output)
}
