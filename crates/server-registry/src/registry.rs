//! Thread-safe name → descriptor table.

use crate::descriptor::ServerDescriptor;
use crate::RegistryError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;

/// Registered server descriptors, keyed by name.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    servers: RwLock<BTreeMap<String, ServerDescriptor>>,
}

impl ServerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new server.
    ///
    /// # Errors
    ///
    /// Validation errors, or `RegistryError::AlreadyExists` if the name is taken.
    pub fn register(&self, descriptor: ServerDescriptor) -> Result<(), RegistryError> {
        descriptor.validate()?;

        let mut servers = self.servers.write();
        if servers.contains_key(&descriptor.name) {
            return Err(RegistryError::AlreadyExists(descriptor.name));
        }

        info!(server = %descriptor.name, command = %descriptor.command, "Registering server");
        servers.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Insert or replace a server. Returns the previous descriptor.
    ///
    /// # Errors
    ///
    /// Validation errors.
    pub fn upsert(
        &self,
        descriptor: ServerDescriptor,
    ) -> Result<Option<ServerDescriptor>, RegistryError> {
        descriptor.validate()?;
        info!(server = %descriptor.name, "Upserting server");
        Ok(self
            .servers
            .write()
            .insert(descriptor.name.clone(), descriptor))
    }

    /// Replace an existing server.
    ///
    /// # Errors
    ///
    /// Validation errors, or `RegistryError::NotFound` if the name is unknown.
    pub fn update(&self, descriptor: ServerDescriptor) -> Result<(), RegistryError> {
        descriptor.validate()?;

        let mut servers = self.servers.write();
        let Some(slot) = servers.get_mut(&descriptor.name) else {
            return Err(RegistryError::NotFound(descriptor.name));
        };
        *slot = descriptor;
        Ok(())
    }

    /// Look up a server.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ServerDescriptor> {
        self.servers.read().get(name).cloned()
    }

    /// Remove a server.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if the name is unknown.
    pub fn remove(&self, name: &str) -> Result<ServerDescriptor, RegistryError> {
        let removed = self
            .servers
            .write()
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        info!(server = name, "Removed server");
        Ok(removed)
    }

    /// All descriptors, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<ServerDescriptor> {
        self.servers.read().values().cloned().collect()
    }

    /// Number of registered servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.read().len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.read().is_empty()
    }
}
