//! Catalog access and DDL retrieval.
//!
//! [`CatalogClient`] owns the single database session of a run and answers
//! three questions: which tables exist, what a table's DDL is, and what a
//! table's columns are. Drivers plug in underneath through the
//! [`CatalogConnector`] and [`CatalogSession`] traits.
//!
//! DDL retrieval has two tiers. The native metadata call is tried first; if
//! it errors or comes back blank, the statement is rebuilt from column
//! metadata by [`synthesize_ddl`].

mod ddl;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

use crate::Result;
use crate::config::DatabaseConfig;
use crate::error::ExportError;
use crate::models::{ColumnDef, ColumnRecord, TableRef};
use async_trait::async_trait;
use std::io::Read;
use tracing::{debug, info, warn};

pub use ddl::{column_line, resolve_type, synthesize_ddl};

/// Raw result of a native DDL call.
///
/// Small results arrive as text; large-object results arrive as a reader
/// that must be drained with [`DdlResult::into_text`].
pub enum DdlResult {
    PlainText(String),
    Streamed(Box<dyn Read + Send>),
}

impl DdlResult {
    /// Resolves the result into a single string, draining a stream if needed.
    ///
    /// Draining blocks on the underlying reader.
    ///
    /// # Errors
    /// Returns the reader's I/O error, including invalid UTF-8.
    pub fn into_text(self) -> std::io::Result<String> {
        match self {
            Self::PlainText(text) => Ok(text),
            Self::Streamed(mut reader) => {
                let mut text = String::new();
                reader.read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

impl std::fmt::Debug for DdlResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText(text) => f.debug_tuple("PlainText").field(&text.len()).finish(),
            Self::Streamed(_) => f.write_str("Streamed(..)"),
        }
    }
}

/// Opens catalog sessions for one database engine.
#[async_trait]
pub trait CatalogConnector: Send + Sync {
    /// Engine identifier used in logs
    fn backend_name(&self) -> &'static str;

    /// Establishes a session.
    ///
    /// # Errors
    /// Returns a connection error on network, authentication or service
    /// resolution failure. The error never includes the password.
    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn CatalogSession>>;
}

/// Raw catalog queries over one open session.
#[async_trait]
pub trait CatalogSession: Send + Sync {
    /// Tables owned by the session user, ordered by name
    async fn list_tables(&self) -> Result<Vec<TableRef>>;

    /// Native DDL for a table; `None` when the catalog returned no value
    async fn native_ddl(&self, table: &TableRef) -> Result<Option<DdlResult>>;

    /// Column metadata in physical column order
    async fn column_records(&self, table: &TableRef) -> Result<Vec<ColumnRecord>>;

    /// Releases the session
    async fn close(&self) -> Result<()>;
}

/// Session owner for one export run.
pub struct CatalogClient {
    connector: Box<dyn CatalogConnector>,
    config: DatabaseConfig,
    session: Option<Box<dyn CatalogSession>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("backend", &self.connector.backend_name())
            .field("target", &self.config.safe_description())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl CatalogClient {
    pub fn new(connector: Box<dyn CatalogConnector>, config: DatabaseConfig) -> Self {
        Self {
            connector,
            config,
            session: None,
        }
    }

    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.connector.backend_name()
    }

    /// Opens the session. A second call while connected does nothing.
    ///
    /// # Errors
    /// Returns a connection error if the session cannot be established.
    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            debug!("Already connected, reusing session");
            return Ok(());
        }

        debug!(
            "Connecting to {} at {}",
            self.connector.backend_name(),
            self.config.safe_description()
        );
        let session = self.connector.connect(&self.config).await?;
        self.session = Some(session);
        info!("Connected to {} database", self.connector.backend_name());
        Ok(())
    }

    /// Releases the session if one is open.
    ///
    /// Close errors are logged and never returned.
    pub async fn disconnect(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match session.close().await {
            Ok(()) => info!("Disconnected from {} database", self.connector.backend_name()),
            Err(e) => warn!("Error disconnecting from database: {}", e),
        }
    }

    fn session(&self) -> Result<&dyn CatalogSession> {
        self.session.as_deref().ok_or(ExportError::NotConnected)
    }

    /// Lists the tables owned by the session user, ordered by name.
    ///
    /// # Errors
    /// Returns `NotConnected` without a session, or a query error.
    pub async fn list_tables(&self) -> Result<Vec<TableRef>> {
        self.session()?.list_tables().await
    }

    /// Column definitions for a table in physical column order.
    ///
    /// # Errors
    /// Returns `NotConnected` without a session, or a query error.
    pub async fn get_columns(&self, table: &TableRef) -> Result<Vec<ColumnDef>> {
        let records = self.session()?.column_records(table).await?;
        Ok(records.into_iter().map(ColumnDef::from).collect())
    }

    /// DDL for a table, native first and synthesized from columns otherwise.
    ///
    /// # Errors
    /// Returns `NotConnected` without a session. A failing native call is
    /// never returned; only a failing column query during the fallback is.
    pub async fn get_table_ddl(&self, table: &TableRef) -> Result<String> {
        let session = self.session()?;

        match Self::native_ddl(session, table).await {
            Ok(Some(ddl)) => return Ok(ddl),
            Ok(None) => debug!("Native DDL for {} was empty, generating from columns", table),
            Err(e) => debug!(
                "DBMS_METADATA failed for {}, generating from columns: {}",
                table, e
            ),
        }

        let columns = self.get_columns(table).await?;
        Ok(synthesize_ddl(table, &columns))
    }

    async fn native_ddl(session: &dyn CatalogSession, table: &TableRef) -> Result<Option<String>> {
        let Some(result) = session.native_ddl(table).await? else {
            return Ok(None);
        };

        let text = match result {
            DdlResult::PlainText(text) => text,
            streamed @ DdlResult::Streamed(_) => {
                tokio::task::spawn_blocking(move || streamed.into_text())
                    .await
                    .map_err(|e| ExportError::query_failed(format!("draining DDL for {}", table), e))?
                    .map_err(|e| ExportError::query_failed(format!("reading DDL for {}", table), e))?
            }
        };

        Ok(Some(text).filter(|ddl| !ddl.trim().is_empty()))
    }
}
