//! Export orchestration.
//!
//! [`DdlExporter`] runs the whole export: validate configuration, prepare the
//! output directory, connect, list tables, export each table in isolation,
//! disconnect, and write the summary. A failing table is recorded and the
//! loop moves on; only configuration, connection, directory and listing
//! failures abort the run.

use crate::Result;
use crate::catalog::{CatalogClient, CatalogConnector};
use crate::config::ExportConfig;
use crate::models::{ExportReport, ExportResult, ExportRun, TableRef};
use crate::writer::FileWriter;
use tracing::{debug, info, warn};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Connecting,
    Listing,
    /// Working on table `index` (zero-based) of `total`
    Exporting { index: usize, total: usize },
    Disconnecting,
    Done { aborted: bool },
}

impl std::fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Connecting => f.write_str("connecting"),
            Self::Listing => f.write_str("listing"),
            Self::Exporting { index, total } => {
                write!(f, "exporting {}/{}", index.saturating_add(1), total)
            }
            Self::Disconnecting => f.write_str("disconnecting"),
            Self::Done { aborted: false } => f.write_str("done"),
            Self::Done { aborted: true } => f.write_str("aborted"),
        }
    }
}

/// Drives one export run.
#[derive(Debug)]
pub struct DdlExporter {
    config: ExportConfig,
    client: CatalogClient,
    writer: FileWriter,
    phase: ExportPhase,
}

impl DdlExporter {
    /// Wires the catalog client and writer from one configuration.
    pub fn new(config: ExportConfig, connector: Box<dyn CatalogConnector>) -> Self {
        let client = CatalogClient::new(connector, config.database.clone());
        let writer = FileWriter::new(config.output_dir.clone());
        Self {
            config,
            client,
            writer,
            phase: ExportPhase::Idle,
        }
    }

    pub const fn phase(&self) -> ExportPhase {
        self.phase
    }

    pub const fn writer(&self) -> &FileWriter {
        &self.writer
    }

    fn enter(&mut self, phase: ExportPhase) {
        debug!("Export phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs the export.
    ///
    /// # Errors
    /// Returns the terminal error when configuration, output directory,
    /// connection or table listing fails. Per-table failures are reported in
    /// the returned [`ExportReport`] instead.
    pub async fn export(&mut self) -> Result<ExportReport> {
        info!("Starting DDL export process...");

        self.config.validate()?;
        self.writer.ensure_output_directory().await?;

        self.enter(ExportPhase::Connecting);
        if let Err(e) = self.client.connect().await {
            debug!("Connection failed, aborting run: {}", e);
            self.release(true).await;
            return Err(e);
        }

        self.enter(ExportPhase::Listing);
        info!("Fetching table list...");
        let tables = match self.client.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                debug!("Table listing failed, aborting run: {}", e);
                self.release(true).await;
                return Err(e);
            }
        };
        info!("Found {} tables to export", tables.len());

        let report = self.export_tables(tables).await;
        self.release(false).await;

        if let Err(e) = self.writer.create_summary_file(&report.run).await {
            warn!("Error writing summary file: {}", e);
        }

        info!(
            "Export completed: {} tables, {} exported, {} failed",
            report.run.total_tables,
            report.run.success_count,
            report.run.failed_count()
        );
        Ok(report)
    }

    async fn export_tables(&mut self, tables: Vec<TableRef>) -> ExportReport {
        let total = tables.len();
        let mut run = ExportRun::new(total);
        let mut results = Vec::with_capacity(total);

        for (index, table) in tables.into_iter().enumerate() {
            self.enter(ExportPhase::Exporting { index, total });
            info!("Exporting DDL for {}...", table);

            let result = match self.export_table(&table).await {
                Ok(path) => ExportResult::success(table, path),
                Err(e) => {
                    debug!("Export of {} failed: {}", table, e);
                    ExportResult::failure(table, e)
                }
            };

            run.record(&result);
            results.push(result);
        }

        ExportReport { run, results }
    }

    async fn export_table(&self, table: &TableRef) -> Result<std::path::PathBuf> {
        let ddl = self.client.get_table_ddl(table).await?;
        self.writer.write_ddl_file(table, &ddl).await
    }

    async fn release(&mut self, aborted: bool) {
        self.enter(ExportPhase::Disconnecting);
        self.client.disconnect().await;
        self.enter(ExportPhase::Done { aborted });
    }
}
