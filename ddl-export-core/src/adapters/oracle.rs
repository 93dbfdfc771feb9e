//! Oracle catalog adapter.
//!
//! Reads table inventory and column metadata from the `ALL_*` dictionary
//! views and native DDL from `DBMS_METADATA`. All statements are read-only.
//!
//! # Note
//!
//! The `oracle` crate loads Oracle Instant Client at runtime. Builds succeed
//! without it; connecting fails with a connection error instead.
//!
//! The driver is blocking, so every call runs on tokio's blocking pool while
//! the connection sits behind a mutex. Large-object results are read to the
//! end inside that call, while the lock is held, so no driver handle leaves
//! the blocking task.

use crate::Result;
use crate::catalog::{CatalogConnector, CatalogSession, DdlResult};
use crate::config::DatabaseConfig;
use crate::error::ExportError;
use crate::models::{ColumnRecord, TableRef};
use async_trait::async_trait;
use oracle::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;
use zeroize::Zeroizing;

const LIST_TABLES_SQL: &str = "
    SELECT table_name, owner
    FROM all_tables
    WHERE owner = USER
    ORDER BY table_name";

const NATIVE_DDL_SQL: &str = "
    SELECT DBMS_METADATA.GET_DDL('TABLE', :table_name, :owner)
    FROM dual";

const COLUMNS_SQL: &str = "
    SELECT column_name, data_type, data_length, data_precision, data_scale,
           nullable, data_default
    FROM all_tab_columns
    WHERE table_name = :table_name
      AND owner = :owner
    ORDER BY column_id";

/// Raw `ALL_TAB_COLUMNS` row in select-list order
type ColumnRow = (
    String,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<String>,
);

/// Opens Oracle sessions over EZConnect (`host:port/service_name`).
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleConnector;

impl OracleConnector {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogConnector for OracleConnector {
    fn backend_name(&self) -> &'static str {
        "oracle"
    }

    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn CatalogSession>> {
        let target = config.safe_description();
        let user = config.credentials.username().to_string();
        let password = Zeroizing::new(config.credentials.password().unwrap_or_default().to_string());
        let connect_string = config.connect_string();

        let connection = tokio::task::spawn_blocking(move || {
            Connection::connect(&user, password.as_str(), &connect_string)
        })
        .await
        .map_err(|e| ExportError::connection_failed(target.clone(), e))?
        .map_err(|e| ExportError::connection_failed(target.clone(), e))?;

        debug!("Oracle session established for {}", target);
        Ok(Box::new(OracleSession::new(connection)))
    }
}

/// One open Oracle connection.
pub struct OracleSession {
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for OracleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleSession").finish_non_exhaustive()
    }
}

impl OracleSession {
    fn new(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    /// Runs a blocking driver call against the connection.
    async fn run<T, F>(&self, context: String, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> oracle::Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let join_context = context.clone();

        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| ExportError::query_detail(context.clone(), "connection lock poisoned"))?;
            op(&*guard).map_err(|e| ExportError::query_failed(context, e))
        })
        .await
        .map_err(|e| ExportError::query_failed(join_context, e))?
    }
}

#[async_trait]
impl CatalogSession for OracleSession {
    async fn list_tables(&self) -> Result<Vec<TableRef>> {
        self.run("listing tables".to_string(), |conn| {
            conn.query_as::<(String, String)>(LIST_TABLES_SQL, &[])?
                .map(|row| row.map(|(name, owner)| TableRef { name, owner }))
                .collect()
        })
        .await
    }

    async fn native_ddl(&self, table: &TableRef) -> Result<Option<DdlResult>> {
        let name = table.name.clone();
        let owner = table.owner.clone();

        self.run(format!("DBMS_METADATA.GET_DDL for {}", table), move |conn| {
            let row = conn.query_row_named(
                NATIVE_DDL_SQL,
                &[("table_name", &name), ("owner", &owner)],
            )?;
            // CLOB column, read in full by the driver
            let ddl = row.get::<_, Option<String>>(0_usize)?;
            Ok(native_result(ddl))
        })
        .await
    }

    async fn column_records(&self, table: &TableRef) -> Result<Vec<ColumnRecord>> {
        let name = table.name.clone();
        let owner = table.owner.clone();

        self.run(format!("fetching columns for {}", table), move |conn| {
            conn.query_as_named::<ColumnRow>(
                COLUMNS_SQL,
                &[("table_name", &name), ("owner", &owner)],
            )?
            .map(|row| row.map(column_record))
            .collect()
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let connection = Arc::clone(&self.connection);

        tokio::task::spawn_blocking(move || match connection.lock() {
            Ok(guard) => guard
                .close()
                .map_err(|e| ExportError::connection_failed("closing session", e)),
            Err(_) => Err(ExportError::connection_failed(
                "closing session",
                crate::error::Detail("connection lock poisoned".to_string()),
            )),
        })
        .await
        .map_err(|e| ExportError::connection_failed("closing session", e))?
    }
}

fn native_result(ddl: Option<String>) -> Option<DdlResult> {
    ddl.map(DdlResult::PlainText)
}

fn column_record(row: ColumnRow) -> ColumnRecord {
    let (name, data_type, data_length, data_precision, data_scale, nullable, data_default) = row;
    ColumnRecord {
        name,
        data_type: data_type.unwrap_or_default(),
        data_length,
        data_precision,
        data_scale,
        nullable: nullable.unwrap_or_else(|| "Y".to_string()),
        data_default,
    }
}
