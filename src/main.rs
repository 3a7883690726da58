//! community-guard CLI entry point
//!
//! Civic issue reports and community events - CLI + web API

use community_guard::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
