//! JSON output formatter

use crate::coord::Coordinates;
use crate::error::Result;
use crate::form::Receipt;
use crate::format::OutputFormatter;
use crate::geo::{ResolvedAddress, SearchResult};
use serde_json::json;

/// JSON formatter - outputs pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }

    fn format_results(&self, query: &str, results: &[SearchResult]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&json!({
            "query": query,
            "results": results,
        }))?)
    }

    fn format_address(&self, coords: Coordinates, resolved: &ResolvedAddress) -> Result<String> {
        Ok(serde_json::to_string_pretty(&json!({
            "coordinates": coords,
            "address": resolved.address,
            "source": resolved.source,
        }))?)
    }

    fn format_receipt(&self, receipt: &Receipt) -> Result<String> {
        Ok(serde_json::to_string_pretty(receipt)?)
    }
}
