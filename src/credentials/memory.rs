//! In-memory credential store.

use std::collections::BTreeMap;

use super::{CredentialError, CredentialStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    secrets: BTreeMap<(String, String), String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret.
    pub fn with_secret(mut self, realm: &str, username: &str, secret: &str) -> Self {
        self.secrets
            .insert((realm.to_string(), username.to_string()), secret.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn lookup(&self, realm: &str, username: &str) -> Result<Option<String>, CredentialError> {
        Ok(self
            .secrets
            .get(&(realm.to_string(), username.to_string()))
            .cloned())
    }

    fn create(&mut self, realm: &str, username: &str, secret: &str) -> Result<(), CredentialError> {
        self.secrets
            .insert((realm.to_string(), username.to_string()), secret.to_string());
        Ok(())
    }

    fn delete(&mut self, realm: &str, username: &str) -> Result<bool, CredentialError> {
        Ok(self
            .secrets
            .remove(&(realm.to_string(), username.to_string()))
            .is_some())
    }
}
