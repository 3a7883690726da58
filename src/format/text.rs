//! Human-readable text output formatter

use crate::coord::Coordinates;
use crate::error::Result;
use crate::form::{Receipt, Record};
use crate::format::OutputFormatter;
use crate::geo::{ResolvedAddress, SearchResult};
use crate::location::LocationSelection;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn describe_location(location: &LocationSelection) -> String {
    match location {
        LocationSelection::Manual { address } => address.clone(),
        LocationSelection::MapPicked {
            coordinates,
            address,
        } => {
            if *address == coordinates.to_address() {
                format!("({})", coordinates)
            } else {
                format!("{} ({})", address, coordinates)
            }
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_results(&self, query: &str, results: &[SearchResult]) -> Result<String> {
        if results.is_empty() {
            return Ok(format!("No results for '{}'", query));
        }

        let mut output = format!("Results for '{}':\n", query);
        for (index, result) in results.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({})\n",
                index + 1,
                result.display_name,
                result.coordinates
            ));
        }
        Ok(output)
    }

    fn format_address(&self, coords: Coordinates, resolved: &ResolvedAddress) -> Result<String> {
        let mut output = resolved.address.clone();
        if resolved.is_fallback() {
            output.push_str(&format!("\n(no address found near {})", coords));
        }
        Ok(output)
    }

    fn format_receipt(&self, receipt: &Receipt) -> Result<String> {
        let submission = &receipt.submission;
        let mut output = String::new();

        output.push_str(&format!("community-guard {} ({})\n", submission.kind(), submission.id));
        output.push_str(&format!(
            "Submitted: {}\n",
            submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        match &submission.record {
            Record::Issue(report) => {
                output.push_str(&format!("Subject: {}\n", report.subject));
                output.push_str(&format!("Details: {}\n", report.details));
                output.push_str(&format!("Location: {}\n", describe_location(&report.location)));
                if let Some(photo) = &report.photo {
                    output.push_str(&format!("Photo: {}\n", photo.file_name));
                }
            }
            Record::Event(event) => {
                output.push_str(&format!("Type: {}\n", event.event_type));
                output.push_str(&format!("Details: {}\n", event.details));
                output.push_str(&format!("Start: {}\n", event.start_time.format("%Y-%m-%d %H:%M")));
                if let Some(end) = event.end_time {
                    output.push_str(&format!("End: {}\n", end.format("%Y-%m-%d %H:%M")));
                }
                output.push_str(&format!("Location: {}\n", describe_location(&event.location)));
            }
        }

        output.push('\n');
        output.push_str(&receipt.message);
        Ok(output)
    }
}
