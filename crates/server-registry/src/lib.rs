//! # Server Registry
//!
//! Records how to launch remote tool servers: a name, a command, its
//! arguments and extra environment. Descriptors are validated before they
//! enter the table.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = ServerRegistry::new();
//! registry.register(ServerDescriptor::new("files", "file-server").with_arg("--root=/srv"))?;
//! let files = registry.get("files");
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod descriptor;
pub mod registry;

pub use descriptor::ServerDescriptor;
pub use registry::ServerRegistry;

use thiserror::Error;

/// Errors from descriptor validation and registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name is empty or contains whitespace.
    #[error("Invalid server name: {0:?}")]
    InvalidName(String),

    /// Command is empty.
    #[error("Server {0:?} has no command")]
    MissingCommand(String),

    /// Environment key is empty or contains '='.
    #[error("Server {server:?} has invalid environment key {key:?}")]
    InvalidEnvKey { server: String, key: String },

    /// A server with this name is already registered.
    #[error("Server {0:?} is already registered")]
    AlreadyExists(String),

    /// No server with this name.
    #[error("Server {0:?} not found")]
    NotFound(String),
}
