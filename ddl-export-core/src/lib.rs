//! Core library for exporting Oracle table DDL.
//!
//! This crate connects to one schema, lists the tables the login user owns,
//! retrieves each table's `CREATE TABLE` statement and writes it to its own
//! `.sql` file, followed by an `export_summary.txt` for the run.
//!
//! # Security Guarantees
//! - Passwords are zeroized on drop and never appear in logs or errors
//! - All catalog statements are read-only
//!
//! # Architecture
//! - [`catalog::CatalogClient`] owns the session and the two-tier DDL lookup
//! - [`writer::FileWriter`] formats and writes artifacts
//! - [`exporter::DdlExporter`] drives one run and isolates per-table failures
//! - Drivers live in [`adapters`] behind cargo features

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod models;
pub mod security;
pub mod writer;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogConnector, CatalogSession, DdlResult};
pub use config::{DatabaseConfig, ExportConfig};
pub use error::{ExportError, Result};
pub use exporter::{DdlExporter, ExportPhase};
pub use logging::init_logging;
pub use models::{ColumnDef, ColumnRecord, ExportReport, ExportResult, ExportRun, TableRef};
pub use security::Credentials;
pub use writer::FileWriter;
