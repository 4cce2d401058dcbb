//! Launch descriptor for one remote server.

use crate::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How to start a remote tool server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Unique registry key.
    pub name: String,
    /// Executable to run.
    pub command: String,
    /// Arguments passed to `command`.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the child process.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ServerDescriptor {
    /// Descriptor with no arguments and no extra environment.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set one environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Check the descriptor can be registered.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidName` - empty name or name with whitespace
    /// - `RegistryError::MissingCommand` - blank command
    /// - `RegistryError::InvalidEnvKey` - empty key or key containing `=`
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() || self.name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(self.name.clone()));
        }

        if self.command.trim().is_empty() {
            return Err(RegistryError::MissingCommand(self.name.clone()));
        }

        if let Some(key) = self.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            return Err(RegistryError::InvalidEnvKey {
                server: self.name.clone(),
                key: key.clone(),
            });
        }

        Ok(())
    }
}
