//! Credential handling.
//!
//! The database password lives in a zeroizing buffer for its whole lifetime
//! and is never part of any `Debug` or `Display` output.

use zeroize::{Zeroize, Zeroizing};

/// Secure credential container that automatically zeros memory on drop
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    pub username: Zeroizing<String>,
    pub password: Zeroizing<Option<String>>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing
    pub fn new(username: String, password: Option<String>) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username (still protected by Zeroizing)
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password for handing to the driver at connect time
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Checks if a non-empty username is present
    pub fn has_username(&self) -> bool {
        !self.username.is_empty()
    }

    /// Checks if a non-empty password is present without exposing it
    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username())
            .field("password", &if self.has_password() { "****" } else { "<unset>" })
            .finish()
    }
}

/// Builds the EZConnect descriptor (`host:port/service`) handed to the driver.
pub fn connect_descriptor(host: &str, port: u16, service_name: &str) -> String {
    format!("{}:{}/{}", host, port, service_name)
}

/// Describes a connection target for logs and error context.
///
/// The password is never part of the description.
pub fn describe_target(credentials: &Credentials, descriptor: &str) -> String {
    if credentials.has_username() {
        format!("{}@{}", credentials.username(), descriptor)
    } else {
        descriptor.to_string()
    }
}
