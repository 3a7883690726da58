//! Serve command handler
//!
//! Runs the geocoding proxy and map settings API in the foreground.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Geocoding backend to proxy to (nominatim, offline)
    #[arg(long, short = 'g')]
    pub geocoder: Option<String>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(geocoder) = args.geocoder {
        config.geocoding.backend = geocoder;
    }

    info!(
        "Starting community-guard server v{} on {} (geocoder: {}, map center: {})",
        env!("CARGO_PKG_VERSION"),
        config.server_addr(),
        config.geocoding.backend,
        config.map.center()
    );

    server::run(config).await
}
