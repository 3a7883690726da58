//! Reverse command handler
//!
//! Resolves a coordinate to a human-readable address.

use crate::cli::{list_formats, OutputArgs};
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::GeocodingClient;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, required_unless_present = "list_formats", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, required_unless_present = "list_formats", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the reverse command
///
/// A failed lookup is not an error: the formatted coordinate is printed
/// instead of an address.
pub async fn run(args: ReverseArgs) -> Result<()> {
    if args.output.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let formatter = args.output.formatter()?;

    let coords = Coordinates::new(args.lat.unwrap_or_default(), args.lng.unwrap_or_default());
    coords.validate()?;

    let client = GeocodingClient::from_config(&config.geocoding)?;
    let resolved = client.reverse_lookup(coords).await;

    let output = formatter.format_address(coords, &resolved)?;
    args.output.emit(&output)
}
