//! # fault-owners
//!
//! Looks up the pet of an owner and reports every failure as a rendered
//! fault.
//!
//! ## Usage
//!
//! ```bash
//! # Successful lookup
//! fault-owners lookup Alice
//!
//! # A miss renders the fault and exits non-zero
//! fault-owners lookup Mark
//!
//! # Owners from a file, JSON output
//! fault-owners --owners owners.toml --json-mode join Alice Mark Zed
//! ```

use clap::Parser;
use fault_owners::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // FAULT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FAULT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "fault_owners=debug"
    } else if cli.quiet {
        "fault_owners=error"
    } else {
        "fault_owners=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so that stdout carries only renderings and reports.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
