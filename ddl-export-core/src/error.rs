//! Error types for the export pipeline.
//!
//! Errors carry enough context to identify the failing step and table, but
//! never the database password. Connection errors describe the target as
//! `user@host:port/service` at most.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
///
/// The variants map onto how far an error is allowed to travel:
/// `Configuration`, `Connection` and `Io` end the run, `Query` ends the run
/// only when it comes from table listing, and `FileWrite` is always recorded
/// against a single table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Missing or invalid configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Session could not be established or torn down
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A catalog query was issued without an open session
    #[error("Not connected to database")]
    NotConnected,

    /// Catalog query failed
    #[error("Query execution failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Per-table DDL file could not be written
    #[error("Failed to write DDL file {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed outside of a table file
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with ExportError
pub type Result<T> = std::result::Result<T, ExportError>;

/// Message-only error used when a failure has no underlying source error.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Detail(pub String);

impl ExportError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error that has no driver error behind it
    pub fn query_detail(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::query_failed(context, Detail(detail.into()))
    }

    /// Creates a file write error for the given path
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}
