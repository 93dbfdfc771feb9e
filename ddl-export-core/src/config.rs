//! Run configuration.
//!
//! Values arrive from the environment variables named here (bound by the
//! CLI) or from the builder methods. Every value except the credentials has
//! a default. Credentials are checked by [`ExportConfig::validate`], which
//! the exporter runs before it touches the output directory or the database.

use crate::Result;
use crate::error::ExportError;
use crate::security::{Credentials, connect_descriptor, describe_target};
use std::path::PathBuf;

/// Environment variable holding the database host
pub const ENV_HOST: &str = "DB_HOST";
/// Environment variable holding the listener port
pub const ENV_PORT: &str = "DB_PORT";
/// Environment variable holding the service name
pub const ENV_SERVICE_NAME: &str = "DB_SERVICE_NAME";
/// Environment variable holding the login user
pub const ENV_USER: &str = "DB_USER";
/// Environment variable holding the login password
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
/// Environment variable holding the output directory
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1521;
pub const DEFAULT_SERVICE_NAME: &str = "XEPDB1";
pub const DEFAULT_OUTPUT_DIR: &str = "./ddl_output";

/// Database connection parameters.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub credentials: Credentials,
}

impl DatabaseConfig {
    /// EZConnect descriptor for the driver (`host:port/service`)
    pub fn connect_string(&self) -> String {
        connect_descriptor(&self.host, self.port, &self.service_name)
    }

    /// Password-free description for logs (`user@host:port/service`)
    pub fn safe_description(&self) -> String {
        describe_target(&self.credentials, &self.connect_string())
    }
}

impl std::fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.safe_description())
    }
}

/// Complete configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub database: DatabaseConfig,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                service_name: DEFAULT_SERVICE_NAME.to_string(),
                credentials: Credentials::new(String::new(), None),
            },
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ExportConfig {
    /// Validates the configuration before any side effect of the run.
    ///
    /// # Errors
    /// Returns a configuration error if the user or password is missing, or
    /// if host, service name, port or output directory are unusable.
    pub fn validate(&self) -> Result<()> {
        if !self.database.credentials.has_username() {
            return Err(ExportError::configuration(format!(
                "{} environment variable is required",
                ENV_USER
            )));
        }

        if !self.database.credentials.has_password() {
            return Err(ExportError::configuration(format!(
                "{} environment variable is required",
                ENV_PASSWORD
            )));
        }

        if self.database.host.trim().is_empty() {
            return Err(ExportError::configuration("host cannot be empty"));
        }

        if self.database.port == 0 {
            return Err(ExportError::configuration("port must be greater than 0"));
        }

        if self.database.service_name.trim().is_empty() {
            return Err(ExportError::configuration("service name cannot be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ExportError::configuration("output directory cannot be empty"));
        }

        Ok(())
    }

    /// Builder method to set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.database.host = host.into();
        self
    }

    /// Builder method to set the port.
    pub const fn with_port(mut self, port: u16) -> Self {
        self.database.port = port;
        self
    }

    /// Builder method to set the service name.
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.database.service_name = service_name.into();
        self
    }

    /// Builder method to replace the login user, keeping the password.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        let password = self.database.credentials.password().map(str::to_string);
        self.database.credentials = Credentials::new(user.into(), password);
        self
    }

    /// Builder method to replace the password, keeping the user.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let user = self.database.credentials.username().to_string();
        self.database.credentials = Credentials::new(user, Some(password.into()));
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}
