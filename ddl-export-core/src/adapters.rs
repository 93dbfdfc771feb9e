//! Database driver adapters and connector factory.
//!
//! Each adapter implements [`CatalogConnector`] for one engine behind a
//! cargo feature, so builds without a native client library stay possible.

use crate::Result;
use crate::catalog::CatalogConnector;

#[cfg(feature = "oracle")]
pub mod oracle;

/// Engines this build can talk to.
pub fn supported_backends() -> Vec<&'static str> {
    let mut backends = Vec::new();

    #[cfg(feature = "oracle")]
    backends.push("oracle");

    backends
}

/// Creates the connector for the default catalog backend.
///
/// # Errors
/// Returns a configuration error when the binary was built without any
/// database driver feature.
pub fn default_connector() -> Result<Box<dyn CatalogConnector>> {
    #[cfg(feature = "oracle")]
    {
        Ok(Box::new(oracle::OracleConnector::new()))
    }
    #[cfg(not(feature = "oracle"))]
    {
        Err(crate::error::ExportError::configuration(
            "No database driver available. Compile with --features oracle",
        ))
    }
}
