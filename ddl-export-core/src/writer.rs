//! Output files: one `.sql` file per table plus `export_summary.txt`.

use crate::Result;
use crate::error::ExportError;
use crate::models::{ExportRun, TableRef};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the run summary inside the output directory
pub const SUMMARY_FILE_NAME: &str = "export_summary.txt";

/// Written in place of an empty DDL statement
const EMPTY_DDL_PLACEHOLDER: &str = "-- DDL content not available or empty\n";

/// Normalizes a DDL statement for writing.
///
/// Whitespace runs collapse to single spaces. The statement is terminated
/// with `;` and a newline.
///
/// ```rust
/// use ddl_export_core::writer::format_ddl;
///
/// let ddl = "CREATE TABLE HR.T (\n    ID NUMBER(10) NOT NULL\n);\n";
/// assert_eq!(format_ddl(ddl), "CREATE TABLE HR.T ( ID NUMBER(10) NOT NULL );\n");
/// ```
pub fn format_ddl(ddl: &str) -> String {
    let mut formatted = ddl.split_whitespace().collect::<Vec<_>>().join(" ");

    if formatted.is_empty() {
        return EMPTY_DDL_PLACEHOLDER.to_string();
    }

    if !formatted.ends_with(';') {
        formatted.push(';');
    }
    formatted.push('\n');
    formatted
}

/// File name for a table's DDL (`OWNER_TABLE.sql`).
///
/// Path separators inside quoted identifiers are replaced so the file always
/// lands directly in the output directory.
pub fn ddl_file_name(table: &TableRef) -> String {
    let sanitize = |part: &str| part.replace(['/', '\\'], "_");
    format!("{}_{}.sql", sanitize(&table.owner), sanitize(&table.name))
}

/// Renders the summary text for a run.
pub fn render_summary(
    total: usize,
    success_count: usize,
    failed: &[TableRef],
    exported_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "DDL Export Summary".to_string(),
        "===================".to_string(),
        format!(
            "Export Date: {}",
            exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        format!("Total Tables Found: {}", total),
        format!("Successfully Exported: {}", success_count),
        format!("Failed Exports: {}", failed.len()),
        String::new(),
    ];

    if !failed.is_empty() {
        lines.push("Failed Tables:".to_string());
        lines.extend(failed.iter().map(|table| format!("- {}", table)));
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}

/// Writes export artifacts below one output directory.
#[derive(Debug, Clone)]
pub struct FileWriter {
    output_dir: PathBuf,
}

impl FileWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Creates the output directory (and parents) if it does not exist.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub async fn ensure_output_directory(&self) -> Result<()> {
        let exists = tokio::fs::try_exists(&self.output_dir)
            .await
            .map_err(|e| ExportError::Io {
                context: format!("Failed to inspect {}", self.output_dir.display()),
                source: e,
            })?;

        if !exists {
            tokio::fs::create_dir_all(&self.output_dir)
                .await
                .map_err(|e| ExportError::Io {
                    context: format!(
                        "Failed to create output directory {}",
                        self.output_dir.display()
                    ),
                    source: e,
                })?;
            info!("Created output directory: {}", self.output_dir.display());
        }

        Ok(())
    }

    /// Writes the formatted DDL for a table and returns the file path.
    ///
    /// # Errors
    /// Returns a file write error naming the target path.
    pub async fn write_ddl_file(&self, table: &TableRef, ddl: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(ddl_file_name(table));

        tokio::fs::write(&path, format_ddl(ddl))
            .await
            .map_err(|e| ExportError::file_write(&path, e))?;

        info!("DDL written to: {}", path.display());
        Ok(path)
    }

    /// Writes `export_summary.txt` for a finished run.
    ///
    /// # Errors
    /// Returns a file write error naming the summary path.
    pub async fn create_summary_file(&self, run: &ExportRun) -> Result<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE_NAME);
        let summary = render_summary(
            run.total_tables,
            run.success_count,
            &run.failed,
            run.exported_at,
        );

        tokio::fs::write(&path, summary)
            .await
            .map_err(|e| ExportError::file_write(&path, e))?;

        info!("Summary written to: {}", path.display());
        Ok(path)
    }
}
