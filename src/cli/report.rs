//! Report command handler
//!
//! Fills in and submits the issue report form.

use crate::cli::{LocationArgs, OutputArgs};
use crate::config::Config;
use crate::error::Result;
use crate::form::{AcknowledgeSink, FormKind, PhotoAttachment};
use crate::geo::GeocodingClient;
use crate::session::Session;
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Report command arguments
#[derive(Args)]
pub struct ReportArgs {
    /// Short subject of the issue
    pub subject: String,

    /// Description of the issue
    pub details: String,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Photo of the issue
    #[arg(long)]
    pub photo: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the report command
pub async fn run(args: ReportArgs) -> Result<()> {
    let config = Config::load()?;
    let formatter = args.output.formatter()?;
    let client = GeocodingClient::from_config(&config.geocoding)?;

    let mut session = Session::new(&config);
    session.switch_to(FormKind::Issue);

    let form = session.issue_mut();
    form.set_subject(args.subject);
    form.set_details(args.details);
    if let Some(path) = args.photo {
        if !path.exists() {
            warn!("Photo {} does not exist", path.display());
        }
        form.attach_photo(PhotoAttachment::from_path(path));
    }

    args.location.fill(&mut session, &client).await?;

    let receipt = session.submit_active(&AcknowledgeSink)?;
    let output = formatter.format_receipt(&receipt)?;
    args.output.emit(&output)
}
