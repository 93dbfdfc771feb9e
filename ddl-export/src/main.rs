//! Oracle table DDL export tool.
//!
//! Writes one `OWNER_TABLE.sql` file per table owned by the login user plus
//! an `export_summary.txt`. Per-table failures are reported and do not change
//! the exit code; configuration, connection and listing failures exit with 1.
//!
//! # Security Guarantees
//! - Read-only database operations only
//! - Passwords are never logged or printed

use clap::Parser;
use ddl_export::{Cli, load_dotenv, run};
use ddl_export_core::init_logging;
use std::process::ExitCode;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    // Must run before parsing so clap sees the file's variables
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::from(1);
    }

    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => debug!("Ignoring .env file: {}", e),
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Export failed: {}", e);
            ExitCode::from(1)
        }
    }
}
