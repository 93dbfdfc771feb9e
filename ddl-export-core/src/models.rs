//! Data structures shared by the catalog client, the exporter and the writer.

use crate::error::ExportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A table as listed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub owner: String,
}

impl TableRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Qualified name as written in DDL and in the summary (`OWNER.NAME`)
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// One row of column metadata as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnRecord {
    pub name: String,
    pub data_type: String,
    pub data_length: Option<i64>,
    pub data_precision: Option<i64>,
    pub data_scale: Option<i64>,
    /// Single-character nullability flag, `N` for NOT NULL
    pub nullable: String,
    pub data_default: Option<String>,
}

/// A column definition ready for DDL synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// Type with its length/precision suffix, e.g. `VARCHAR2(50)`
    pub type_name: String,
    pub nullable: bool,
    pub default_value: Option<String>,
}

/// Outcome of exporting a single table.
#[derive(Debug)]
pub struct ExportResult {
    pub table: TableRef,
    /// Path of the written file, or the error that stopped this table
    pub outcome: Result<PathBuf, ExportError>,
}

impl ExportResult {
    pub const fn success(table: TableRef, path: PathBuf) -> Self {
        Self {
            table,
            outcome: Ok(path),
        }
    }

    pub const fn failure(table: TableRef, error: ExportError) -> Self {
        Self {
            table,
            outcome: Err(error),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&ExportError> {
        self.outcome.as_ref().err()
    }
}

/// Aggregate counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRun {
    pub total_tables: usize,
    pub success_count: usize,
    /// Failed tables in the order they were attempted
    pub failed: Vec<TableRef>,
    pub exported_at: DateTime<Utc>,
}

impl ExportRun {
    /// Starts a run for the given number of listed tables.
    pub fn new(total_tables: usize) -> Self {
        Self {
            total_tables,
            success_count: 0,
            failed: Vec::new(),
            exported_at: Utc::now(),
        }
    }

    /// Counts one table outcome.
    pub fn record(&mut self, result: &ExportResult) {
        if result.is_success() {
            self.success_count = self.success_count.saturating_add(1);
        } else {
            self.failed.push(result.table.clone());
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether every listed table has been accounted for.
    pub fn is_complete(&self) -> bool {
        self.success_count.saturating_add(self.failed.len()) == self.total_tables
    }
}

/// Everything the exporter hands back to its caller.
#[derive(Debug)]
pub struct ExportReport {
    pub run: ExportRun,
    pub results: Vec<ExportResult>,
}

impl ExportReport {
    /// Per-table failures with their errors, in attempt order.
    pub fn failures(&self) -> impl Iterator<Item = (&TableRef, &ExportError)> {
        self.results
            .iter()
            .filter_map(|result| result.error().map(|error| (&result.table, error)))
    }
}
