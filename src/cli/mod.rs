//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod event;
pub mod report;
pub mod reverse;
pub mod search;
pub mod serve;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::geo::{GeoBackend, GeocodingClient};
use crate::location::ClickTarget;
use crate::session::Session;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Civic issue reports and community events
#[derive(Parser)]
#[command(name = "community-guard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for an address
    Search(search::SearchArgs),

    /// Look up the address of a coordinate
    Reverse(reverse::ReverseArgs),

    /// Report a civic issue
    Report(report::ReportArgs),

    /// Announce a community event
    Event(event::EventArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Report(args) => report::run(args).await,
        Commands::Event(args) => event::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

/// Initialize tracing; `RUST_LOG` overrides the default level
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Output options shared by commands that print results
#[derive(Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

impl OutputArgs {
    pub fn formatter(&self) -> Result<Box<dyn OutputFormatter>> {
        get_formatter(&self.format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", self.format)))
    }

    /// Print to stdout or write to the requested file
    pub fn emit(&self, output: &str) -> Result<()> {
        if let Some(path) = &self.output {
            std::fs::write(path, output)?;
            eprintln!("Output written to {}", path);
        } else {
            println!("{}", output);
        }
        Ok(())
    }
}

/// Print available output formats
pub fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

/// Where a submitted record takes place
#[derive(Args)]
pub struct LocationArgs {
    /// Address typed by hand
    #[arg(long, conflicts_with_all = ["lat", "lng", "place"])]
    pub address: Option<String>,

    /// Latitude of the point picked on the map
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the point picked on the map
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Search for a place and use the first result
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub place: Option<String>,
}

impl LocationArgs {
    /// Fill the active section's location field
    ///
    /// A coordinate goes through the map picker and a reverse lookup, a place
    /// query through the search box. Leaves the field empty when no location
    /// option was given, so validation reports it.
    pub async fn fill<B: GeoBackend>(
        &self,
        session: &mut Session,
        client: &GeocodingClient<B>,
    ) -> Result<()> {
        if let Some(address) = &self.address {
            let active = session.active();
            return session.location_mut(active).set_manual_text(address.as_str());
        }

        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            let coords = Coordinates::new(lat, lng);
            coords.validate()?;
            session.open_map_picker()?;
            if let Some(address) = session.pick_on_map(ClickTarget::Map, coords, client).await? {
                debug!("Picked {} resolved to '{}'", coords, address);
            }
            return Ok(());
        }

        if let Some(query) = &self.place {
            if session.search(query, client).await.is_empty() {
                return Err(Error::Location(format!("no places found for '{}'", query)));
            }
            return session.select_search_result(0);
        }

        Ok(())
    }
}
