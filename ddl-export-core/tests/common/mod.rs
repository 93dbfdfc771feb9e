//! In-memory catalog used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ddl_export_core::error::Detail;
use ddl_export_core::{
    CatalogConnector, CatalogSession, ColumnRecord, DatabaseConfig, DdlResult, ExportConfig,
    ExportError, Result, TableRef,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_PASSWORD: &str = "super_secret_password_123";

/// How a table answers the DDL lookups
#[derive(Debug, Clone)]
pub enum TableBehavior {
    /// Native DDL call returns this text
    Native(String),
    /// Native call errors, column metadata is available
    Fallback(Vec<ColumnRecord>),
    /// Both native DDL and column metadata fail
    Broken,
}

#[derive(Debug, Default)]
pub struct Counters {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    pub tables: Vec<(TableRef, TableBehavior)>,
    pub connect_fails: bool,
    pub list_fails: bool,
    pub counters: Arc<Counters>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, owner: &str, name: &str, behavior: TableBehavior) -> Self {
        self.tables.push((TableRef::new(owner, name), behavior));
        self
    }

    pub fn connector(&self) -> Box<dyn CatalogConnector> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl CatalogConnector for MemoryCatalog {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn CatalogSession>> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        if self.connect_fails {
            return Err(ExportError::connection_failed(
                config.safe_description(),
                Detail("ORA-12541: TNS:no listener".to_string()),
            ));
        }
        Ok(Box::new(self.clone()))
    }
}

impl MemoryCatalog {
    fn behavior(&self, table: &TableRef) -> Result<&TableBehavior> {
        self.tables
            .iter()
            .find(|(candidate, _)| candidate == table)
            .map(|(_, behavior)| behavior)
            .ok_or_else(|| ExportError::query_detail(table.to_string(), "ORA-00942"))
    }
}

#[async_trait]
impl CatalogSession for MemoryCatalog {
    async fn list_tables(&self) -> Result<Vec<TableRef>> {
        if self.list_fails {
            return Err(ExportError::query_detail(
                "listing tables",
                "ORA-00942: table or view does not exist",
            ));
        }
        let mut tables: Vec<TableRef> = self.tables.iter().map(|(t, _)| t.clone()).collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    async fn native_ddl(&self, table: &TableRef) -> Result<Option<DdlResult>> {
        match self.behavior(table)? {
            TableBehavior::Native(ddl) => Ok(Some(DdlResult::PlainText(ddl.clone()))),
            TableBehavior::Fallback(_) | TableBehavior::Broken => Err(ExportError::query_detail(
                format!("DBMS_METADATA.GET_DDL for {}", table),
                "ORA-31603: object not found",
            )),
        }
    }

    async fn column_records(&self, table: &TableRef) -> Result<Vec<ColumnRecord>> {
        match self.behavior(table)? {
            TableBehavior::Fallback(columns) => Ok(columns.clone()),
            TableBehavior::Native(_) => Ok(Vec::new()),
            TableBehavior::Broken => Err(ExportError::query_detail(
                format!("fetching columns for {}", table),
                "ORA-01031: insufficient privileges",
            )),
        }
    }

    async fn close(&self) -> Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Valid configuration writing into `output_dir`
pub fn test_config(output_dir: &Path) -> ExportConfig {
    ExportConfig::default()
        .with_user("hr")
        .with_password(TEST_PASSWORD)
        .with_output_dir(output_dir)
}

pub fn number_column(name: &str, precision: i64, nullable: bool) -> ColumnRecord {
    ColumnRecord {
        name: name.to_string(),
        data_type: "NUMBER".to_string(),
        data_length: Some(22),
        data_precision: Some(precision),
        data_scale: Some(0),
        nullable: if nullable { "Y" } else { "N" }.to_string(),
        data_default: None,
    }
}

pub fn varchar_column(name: &str, length: i64) -> ColumnRecord {
    ColumnRecord {
        name: name.to_string(),
        data_type: "VARCHAR2".to_string(),
        data_length: Some(length),
        nullable: "Y".to_string(),
        ..Default::default()
    }
}
