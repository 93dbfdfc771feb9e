//! Command-line front end for `ddl-export`.
//!
//! Configuration comes from the environment (`DB_HOST`, `DB_PORT`,
//! `DB_SERVICE_NAME`, `DB_USER`, `DB_PASSWORD`, `OUTPUT_DIR`), optionally
//! seeded from a `.env` file; flags given on the command line override it.
//! All failure reporting for a run happens here.

use clap::{Args, Parser, Subcommand};
use ddl_export_core::{
    CatalogClient, CatalogConnector, Credentials, DatabaseConfig, DdlExporter, ExportConfig,
    ExportError, ExportReport, Result, TableRef, adapters, config,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "ddl-export")]
#[command(about = "Export Oracle table DDL to one SQL file per table")]
#[command(version)]
#[command(long_about = "
ddl-export - Oracle table DDL exporter

Connects to one schema, lists the tables owned by the login user and writes
each table's CREATE TABLE statement to OWNER_TABLE.sql in the output
directory, followed by export_summary.txt.

DDL comes from DBMS_METADATA.GET_DDL when available and is rebuilt from
ALL_TAB_COLUMNS otherwise. A failing table is recorded and skipped.

ENVIRONMENT:
  DB_HOST, DB_PORT, DB_SERVICE_NAME, DB_USER, DB_PASSWORD, OUTPUT_DIR
  A .env file in the working directory is loaded first; set variables win.

EXAMPLES:
  DB_USER=hr DB_PASSWORD=... ddl-export
  ddl-export --host ora01 --service-name ORCLPDB1 --user hr --ask-password
  ddl-export tables --json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export DDL for every table (default)
    Export,
    /// Test the database connection
    Test,
    /// List the tables that would be exported
    Tables(TablesArgs),
    /// List supported database backends and environment variables
    List,
}

#[derive(Debug, Args)]
pub struct TablesArgs {
    /// Print the table list as JSON
    #[arg(long, help = "Print tables as a JSON array of {name, owner}")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all output except errors"
    )]
    pub quiet: bool,
}

/// Connection settings, each bound to its environment variable.
///
/// A flag on the command line wins over the environment, which wins over
/// the default.
#[derive(Args)]
pub struct ConnectionArgs {
    #[arg(
        long,
        global = true,
        env = config::ENV_HOST,
        default_value = config::DEFAULT_HOST,
        help = "Database host"
    )]
    pub host: String,

    #[arg(
        long,
        global = true,
        env = config::ENV_PORT,
        default_value_t = config::DEFAULT_PORT,
        help = "Listener port"
    )]
    pub port: u16,

    #[arg(
        long,
        global = true,
        env = config::ENV_SERVICE_NAME,
        default_value = config::DEFAULT_SERVICE_NAME,
        help = "Service name"
    )]
    pub service_name: String,

    #[arg(long, global = true, env = config::ENV_USER, help = "Login user")]
    pub user: Option<String>,

    #[arg(
        long,
        global = true,
        env = config::ENV_PASSWORD,
        hide_env_values = true,
        help = "Login password (prefer DB_PASSWORD or --ask-password)"
    )]
    pub password: Option<String>,

    #[arg(
        long,
        global = true,
        env = config::ENV_OUTPUT_DIR,
        default_value = config::DEFAULT_OUTPUT_DIR,
        help = "Output directory for DDL files"
    )]
    pub output_dir: PathBuf,

    #[arg(
        long,
        global = true,
        help = "Prompt for the password when DB_PASSWORD is not set"
    )]
    pub ask_password: bool,
}

impl std::fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("output_dir", &self.output_dir)
            .field("ask_password", &self.ask_password)
            .finish()
    }
}

impl ConnectionArgs {
    /// Builds the run configuration from the parsed settings.
    pub fn to_config(&self) -> ExportConfig {
        ExportConfig {
            database: DatabaseConfig {
                host: self.host.clone(),
                port: self.port,
                service_name: self.service_name.clone(),
                credentials: Credentials::new(
                    self.user.clone().unwrap_or_default(),
                    self.password.clone(),
                ),
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Loads `.env` from the working directory or one of its parents.
///
/// Variables already present in the process environment are kept. A missing
/// file is not an error.
///
/// # Errors
/// Returns the loader error for an unreadable or malformed file.
pub fn load_dotenv() -> std::result::Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Loads a specific env file, with the same rules as [`load_dotenv`].
///
/// # Errors
/// Returns the loader error for an unreadable or malformed file.
pub fn load_dotenv_from(path: &Path) -> std::result::Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Resolves the run configuration from the parsed arguments.
///
/// # Errors
/// Returns a configuration error when the interactive password prompt fails.
pub fn resolve_config(cli: &Cli) -> Result<ExportConfig> {
    let config = cli.connection.to_config();

    if cli.connection.ask_password && !config.database.credentials.has_password() {
        let password = prompt_password(config.database.credentials.username())?;
        return Ok(config.with_password(password));
    }

    Ok(config)
}

fn prompt_password(user: &str) -> Result<String> {
    use std::io::{self, Write};

    eprint!("Password for {}: ", user);
    io::stderr().flush().map_err(|e| {
        ExportError::configuration(format!(
            "Failed to flush stderr before reading password: {}",
            e
        ))
    })?;

    rpassword::read_password()
        .map_err(|e| ExportError::configuration(format!("Failed to read password: {}", e)))
}

/// Runs the selected command with the default database driver.
///
/// # Errors
/// Returns the error that aborted the command.
pub async fn run(cli: &Cli) -> Result<()> {
    if matches!(cli.command, Some(Command::List)) {
        list_supported_backends();
        return Ok(());
    }

    let config = resolve_config(cli)?;
    let connector = adapters::default_connector()?;
    execute(cli.command.as_ref(), config, connector).await
}

/// Runs a command against an explicit connector.
///
/// # Errors
/// Returns the error that aborted the command.
pub async fn execute(
    command: Option<&Command>,
    config: ExportConfig,
    connector: Box<dyn CatalogConnector>,
) -> Result<()> {
    match command {
        None | Some(Command::Export) => {
            let output_dir = config.output_dir.clone();
            let mut exporter = DdlExporter::new(config, connector);
            let report = exporter.export().await?;
            report_export(&report, &output_dir);
            Ok(())
        }
        Some(Command::Test) => test_connection(config, connector).await,
        Some(Command::Tables(args)) => {
            let tables = fetch_tables(config, connector).await?;
            print!("{}", render_tables(&tables, args.json)?);
            Ok(())
        }
        Some(Command::List) => {
            list_supported_backends();
            Ok(())
        }
    }
}

/// Prints the final tally and every per-table failure.
pub fn report_export(report: &ExportReport, output_dir: &Path) {
    for (table, error) in report.failures() {
        error!("Failed to export {}: {}", table, error);
    }

    if report.run.failed_count() > 0 {
        warn!(
            "{} of {} tables failed to export",
            report.run.failed_count(),
            report.run.total_tables
        );
    }

    println!("DDL export completed");
    println!("Output: {}", output_dir.display());
    println!("Tables found: {}", report.run.total_tables);
    println!("Exported: {}", report.run.success_count);
    println!("Failed: {}", report.run.failed_count());
}

async fn test_connection(config: ExportConfig, connector: Box<dyn CatalogConnector>) -> Result<()> {
    config.validate()?;
    info!("Testing connection to {}...", config.database);

    let target = config.database.safe_description();
    let mut client = CatalogClient::new(connector, config.database);
    client.connect().await?;
    client.disconnect().await;

    info!("✓ Connection test successful");
    println!("Connection to {} database at {} successful", client.backend_name(), target);
    Ok(())
}

async fn fetch_tables(
    config: ExportConfig,
    connector: Box<dyn CatalogConnector>,
) -> Result<Vec<TableRef>> {
    config.validate()?;

    let mut client = CatalogClient::new(connector, config.database);
    client.connect().await?;
    let tables = client.list_tables().await;
    client.disconnect().await;
    tables
}

/// Renders a table list as `OWNER.TABLE` lines or as a JSON array.
///
/// # Errors
/// Returns a configuration error if JSON serialization fails.
pub fn render_tables(tables: &[TableRef], json: bool) -> Result<String> {
    if json {
        let mut rendered = serde_json::to_string_pretty(tables).map_err(|e| {
            ExportError::configuration(format!("Failed to serialize table list: {}", e))
        })?;
        rendered.push('\n');
        return Ok(rendered);
    }

    Ok(tables.iter().map(|table| format!("{}\n", table)).collect())
}

fn list_supported_backends() {
    println!("Supported Database Types:");
    println!();

    for backend in adapters::supported_backends() {
        match backend {
            "oracle" => {
                println!("Oracle:");
                println!("  Connection: host:port/service_name (EZConnect)");
                println!("  Requires:   Oracle Instant Client at runtime");
                println!();
            }
            other => {
                println!("{}", other);
                println!();
            }
        }
    }

    println!("Environment:");
    println!("  {:<16} database host (default {})", config::ENV_HOST, config::DEFAULT_HOST);
    println!("  {:<16} listener port (default {})", config::ENV_PORT, config::DEFAULT_PORT);
    println!(
        "  {:<16} service name (default {})",
        config::ENV_SERVICE_NAME,
        config::DEFAULT_SERVICE_NAME
    );
    println!("  {:<16} login user (required)", config::ENV_USER);
    println!("  {:<16} login password (required)", config::ENV_PASSWORD);
    println!(
        "  {:<16} output directory (default {})",
        config::ENV_OUTPUT_DIR,
        config::DEFAULT_OUTPUT_DIR
    );
    println!();
    println!("A .env file in the working directory is loaded before the environment is read.");
}
