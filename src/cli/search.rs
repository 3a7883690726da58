//! Search command handler
//!
//! Forward geocodes free text into candidate places.

use crate::cli::{list_formats, OutputArgs};
use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::{GeoBackend, GeocodingClient};
use crate::location::SearchBox;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address or place to look for
    #[arg(required_unless_present = "list_formats")]
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command
///
/// An unreachable geocoder is reported as "no results", not as an error.
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.output.list_formats {
        list_formats();
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(limit) = args.limit {
        config.geocoding.search_limit = limit;
    }

    let formatter = args.output.formatter()?;
    let client = GeocodingClient::from_config(&config.geocoding)?;

    let query = args.query.unwrap_or_default();
    let output = search_output(&query, &client, formatter.as_ref()).await?;
    args.output.emit(&output)
}

/// Run a search through the search box and format what it shows
async fn search_output<B: GeoBackend>(
    query: &str,
    client: &GeocodingClient<B>,
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    let mut search = SearchBox::new();
    let results = search.search(query, client).await;
    let output = formatter.format_results(query, results)?;

    if let Some(message) = search.message() {
        eprintln!("{}", message);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::format::get_formatter;
    use crate::geo::testing::{Reply, StubBackend};
    use crate::geo::SearchResult;
    use std::time::Duration;

    fn client(search: Reply<Vec<SearchResult>>) -> GeocodingClient<StubBackend> {
        GeocodingClient::new(
            StubBackend::new(search, Reply::Value(None)),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_failed_search_prints_no_results() {
        let formatter = get_formatter("text").unwrap();
        let output = search_output("Obchodná", &client(Reply::Fail), formatter.as_ref())
            .await
            .unwrap();
        assert_eq!(output, "No results for 'Obchodná'");
    }

    #[tokio::test]
    async fn test_failed_search_json_has_empty_results() {
        let formatter = get_formatter("json").unwrap();
        let output = search_output("Obchodná", &client(Reply::Fail), formatter.as_ref())
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_lists_results() {
        let results = vec![SearchResult::new(
            "Obchodná, Bratislava",
            Coordinates::new(48.1482, 17.1067),
        )];
        let formatter = get_formatter("text").unwrap();
        let output = search_output("Obchodná", &client(Reply::Value(results)), formatter.as_ref())
            .await
            .unwrap();
        assert!(output.contains("1. Obchodná, Bratislava"));
    }
}
