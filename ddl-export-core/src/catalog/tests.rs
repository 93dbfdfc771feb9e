//! Unit tests for the catalog client and DDL reconstruction.

use super::*;
use crate::config::ExportConfig;
use crate::error::Detail;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How the fake session answers the native DDL call
#[derive(Clone)]
enum Native {
    Text(&'static str),
    Stream(&'static str),
    Missing,
    Fails,
}

#[derive(Clone)]
struct FakeSession {
    native: Native,
    columns: Option<Vec<ColumnRecord>>,
    close_fails: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl CatalogSession for FakeSession {
    async fn list_tables(&self) -> Result<Vec<TableRef>> {
        Ok(vec![TableRef::new("OWNER", "A"), TableRef::new("OWNER", "B")])
    }

    async fn native_ddl(&self, table: &TableRef) -> Result<Option<DdlResult>> {
        match self.native {
            Native::Text(text) => Ok(Some(DdlResult::PlainText(text.to_string()))),
            Native::Stream(text) => Ok(Some(DdlResult::Streamed(Box::new(Cursor::new(
                text.as_bytes().to_vec(),
            ))))),
            Native::Missing => Ok(None),
            Native::Fails => Err(ExportError::query_detail(
                format!("DBMS_METADATA for {}", table),
                "ORA-31603: object not found",
            )),
        }
    }

    async fn column_records(&self, table: &TableRef) -> Result<Vec<ColumnRecord>> {
        self.columns.clone().ok_or_else(|| {
            ExportError::query_detail(format!("columns for {}", table), "ORA-00942")
        })
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.close_fails {
            Err(ExportError::connection_failed(
                "closing session",
                Detail("ORA-03113: end-of-file on communication channel".into()),
            ))
        } else {
            Ok(())
        }
    }
}

struct FakeConnector {
    session: Option<FakeSession>,
}

#[async_trait]
impl CatalogConnector for FakeConnector {
    fn backend_name(&self) -> &'static str {
        "fake"
    }

    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn CatalogSession>> {
        match &self.session {
            Some(session) => Ok(Box::new(session.clone())),
            None => Err(ExportError::connection_failed(
                config.safe_description(),
                Detail("ORA-01017: invalid username/password".into()),
            )),
        }
    }
}

fn sample_records() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord {
            name: "ID".to_string(),
            data_type: "NUMBER".to_string(),
            data_length: Some(22),
            data_precision: Some(10),
            data_scale: Some(0),
            nullable: "N".to_string(),
            data_default: None,
        },
        ColumnRecord {
            name: "NAME".to_string(),
            data_type: "VARCHAR2".to_string(),
            data_length: Some(50),
            data_precision: None,
            data_scale: None,
            nullable: "Y".to_string(),
            data_default: Some(String::new()),
        },
        ColumnRecord {
            name: "CREATED".to_string(),
            data_type: "DATE".to_string(),
            data_length: Some(7),
            data_precision: None,
            data_scale: None,
            nullable: "Y".to_string(),
            data_default: Some("SYSDATE".to_string()),
        },
    ]
}

const SAMPLE_FALLBACK: &str = "CREATE TABLE OWNER.T (\n    ID NUMBER(10) NOT NULL,\n    NAME VARCHAR2(50),\n    CREATED DATE DEFAULT SYSDATE\n);\n";

fn session(native: Native) -> FakeSession {
    FakeSession {
        native,
        columns: Some(sample_records()),
        close_fails: false,
        closes: Arc::new(AtomicUsize::new(0)),
    }
}

async fn connected_client(session: FakeSession) -> CatalogClient {
    let config = ExportConfig::default().with_user("hr").with_password("pw");
    let mut client = CatalogClient::new(
        Box::new(FakeConnector {
            session: Some(session),
        }),
        config.database,
    );
    client.connect().await.unwrap();
    client
}

#[test]
fn test_resolve_character_types() {
    for base in ["VARCHAR2", "CHAR", "NVARCHAR2", "NCHAR"] {
        let record = ColumnRecord {
            data_type: base.to_string(),
            data_length: Some(30),
            ..Default::default()
        };
        assert_eq!(resolve_type(&record), format!("{}(30)", base));
    }
}

#[test]
fn test_resolve_numeric_types() {
    let mut record = ColumnRecord {
        data_type: "NUMBER".to_string(),
        data_length: Some(22),
        data_precision: Some(8),
        data_scale: Some(3),
        ..Default::default()
    };
    assert_eq!(resolve_type(&record), "NUMBER(8,3)");

    record.data_scale = Some(0);
    assert_eq!(resolve_type(&record), "NUMBER(8)");

    record.data_scale = None;
    assert_eq!(resolve_type(&record), "NUMBER(8)");

    // Unconstrained NUMBER has no precision
    record.data_precision = None;
    assert_eq!(resolve_type(&record), "NUMBER");
}

#[test]
fn test_resolve_other_types_have_no_suffix() {
    for base in ["DATE", "CLOB", "BLOB", "TIMESTAMP(6)", "RAW"] {
        let record = ColumnRecord {
            data_type: base.to_string(),
            data_length: Some(16),
            data_precision: Some(4),
            ..Default::default()
        };
        assert_eq!(resolve_type(&record), base);
    }
}

#[test]
fn test_column_def_from_record() {
    let record = ColumnRecord {
        name: "STATUS".to_string(),
        data_type: "CHAR".to_string(),
        data_length: Some(1),
        nullable: "N".to_string(),
        data_default: Some("'A' \n".to_string()),
        ..Default::default()
    };

    let column = ColumnDef::from(record);
    assert_eq!(column.type_name, "CHAR(1)");
    assert!(!column.nullable);
    assert_eq!(column.default_value.as_deref(), Some("'A'"));
    assert_eq!(column_line(&column), "    STATUS CHAR(1) NOT NULL DEFAULT 'A'");
}

#[test]
fn test_synthesize_ddl_layout() {
    let columns: Vec<ColumnDef> = sample_records().into_iter().map(ColumnDef::from).collect();
    let ddl = synthesize_ddl(&TableRef::new("OWNER", "T"), &columns);
    assert_eq!(ddl, SAMPLE_FALLBACK);
}

#[test]
fn test_synthesize_ddl_without_columns() {
    let ddl = synthesize_ddl(&TableRef::new("OWNER", "EMPTY"), &[]);
    assert_eq!(ddl, "CREATE TABLE OWNER.EMPTY (\n\n);\n");
}

#[test]
fn test_ddl_result_into_text() {
    let plain = DdlResult::PlainText("CREATE TABLE X".to_string());
    assert_eq!(plain.into_text().unwrap(), "CREATE TABLE X");

    let streamed = DdlResult::Streamed(Box::new(Cursor::new(b"CREATE TABLE Y".to_vec())));
    assert_eq!(streamed.into_text().unwrap(), "CREATE TABLE Y");

    let invalid = DdlResult::Streamed(Box::new(Cursor::new(vec![0xff, 0xfe])));
    assert!(invalid.into_text().is_err());
}

#[tokio::test]
async fn test_native_ddl_is_preferred() {
    let client = connected_client(session(Native::Text("CREATE TABLE \"OWNER\".\"T\" (x NUMBER)"))).await;
    let ddl = client.get_table_ddl(&TableRef::new("OWNER", "T")).await.unwrap();
    assert_eq!(ddl, "CREATE TABLE \"OWNER\".\"T\" (x NUMBER)");
}

#[tokio::test]
async fn test_streamed_native_ddl_is_drained() {
    let client = connected_client(session(Native::Stream("\n  CREATE TABLE \"OWNER\".\"T\" (x DATE)"))).await;
    let ddl = client.get_table_ddl(&TableRef::new("OWNER", "T")).await.unwrap();
    assert_eq!(ddl, "\n  CREATE TABLE \"OWNER\".\"T\" (x DATE)");
}

#[tokio::test]
async fn test_blank_native_ddl_falls_back() {
    for native in [Native::Text(""), Native::Text("  \n\t "), Native::Stream(" \n"), Native::Missing] {
        let client = connected_client(session(native)).await;
        let ddl = client.get_table_ddl(&TableRef::new("OWNER", "T")).await.unwrap();
        assert_eq!(ddl, SAMPLE_FALLBACK);
    }
}

#[tokio::test]
async fn test_native_failure_falls_back() {
    let client = connected_client(session(Native::Fails)).await;
    let ddl = client.get_table_ddl(&TableRef::new("OWNER", "T")).await.unwrap();
    assert_eq!(ddl, SAMPLE_FALLBACK);
}

#[tokio::test]
async fn test_fallback_column_failure_is_a_query_error() {
    let mut fake = session(Native::Fails);
    fake.columns = None;
    let client = connected_client(fake).await;

    let err = client.get_table_ddl(&TableRef::new("OWNER", "T")).await.unwrap_err();
    assert!(matches!(err, ExportError::Query { .. }));
}

#[tokio::test]
async fn test_queries_require_session() {
    let config = ExportConfig::default();
    let client = CatalogClient::new(Box::new(FakeConnector { session: None }), config.database);
    let table = TableRef::new("OWNER", "T");

    assert!(matches!(client.list_tables().await, Err(ExportError::NotConnected)));
    assert!(matches!(client.get_columns(&table).await, Err(ExportError::NotConnected)));
    assert!(matches!(client.get_table_ddl(&table).await, Err(ExportError::NotConnected)));
}

#[tokio::test]
async fn test_connect_failure_leaves_client_disconnected() {
    let config = ExportConfig::default().with_user("hr").with_password("hunter2_secret");
    let mut client = CatalogClient::new(Box::new(FakeConnector { session: None }), config.database);

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, ExportError::Connection { .. }));
    assert!(!err.to_string().contains("hunter2_secret"));
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_disconnect_is_idempotent_and_swallows_errors() {
    let mut fake = session(Native::Missing);
    fake.close_fails = true;
    let closes = Arc::clone(&fake.closes);
    let mut client = connected_client(fake).await;

    client.disconnect().await;
    client.disconnect().await;

    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_connect_twice_keeps_session() {
    let fake = session(Native::Missing);
    let closes = Arc::clone(&fake.closes);
    let mut client = connected_client(fake).await;

    client.connect().await.unwrap();
    assert!(client.is_connected());
    assert_eq!(client.list_tables().await.unwrap().len(), 2);

    client.disconnect().await;
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}
