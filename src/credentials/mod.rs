//! Credential storage and bearer-token resolution.
//!
//! A freshly configured token is moved into a [`CredentialStore`] and the
//! configuration is rewritten to hold the [`MASK`] sentinel instead. Later
//! runs see the sentinel and read the clear token back from the store.

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use std::fmt::Debug;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Sentinel stored in configuration in place of a secret.
pub const MASK: &str = "<encrypted>";

/// Username under which the bearer token is stored. The realm is the input name.
pub const TOKEN_USERNAME: &str = "token";

#[derive(Debug, Error)]
pub enum CredentialError {
    /// The configuration holds the mask but the store has no secret for it.
    #[error("Encrypted {username} was not found for {realm}, reconfigure its value.")]
    Missing { realm: String, username: String },

    #[error("credential store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("credential store at {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Secret storage keyed by `(realm, username)`.
pub trait CredentialStore: Debug {
    fn lookup(&self, realm: &str, username: &str) -> Result<Option<String>, CredentialError>;

    fn create(&mut self, realm: &str, username: &str, secret: &str) -> Result<(), CredentialError>;

    /// Returns whether an entry was removed.
    fn delete(&mut self, realm: &str, username: &str) -> Result<bool, CredentialError>;
}

/// The token to authenticate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: String,
    /// True when the configured value was a clear secret that has just been
    /// stored; the configuration field should now be masked.
    pub rotated: bool,
}

/// Resolve the bearer token of input `realm`.
///
/// A masked value is looked up in the store. Anything else replaces the
/// stored secret: the existing entry is deleted and a new one created.
pub fn resolve_token(
    realm: &str,
    configured: &str,
    store: &mut dyn CredentialStore,
) -> Result<ResolvedToken, CredentialError> {
    if configured == MASK {
        let token = store
            .lookup(realm, TOKEN_USERNAME)?
            .ok_or_else(|| CredentialError::Missing {
                realm: realm.to_string(),
                username: TOKEN_USERNAME.to_string(),
            })?;
        return Ok(ResolvedToken {
            token,
            rotated: false,
        });
    }

    if store.lookup(realm, TOKEN_USERNAME)?.is_some() {
        debug!(realm, "Removing current password");
        store.delete(realm, TOKEN_USERNAME)?;
    }
    debug!(realm, "Storing password and updating input");
    store.create(realm, TOKEN_USERNAME, configured)?;

    Ok(ResolvedToken {
        token: configured.to_string(),
        rotated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_token_reads_store() {
        let mut store = MemoryCredentialStore::new().with_secret("prod", TOKEN_USERNAME, "abc");

        let resolved = resolve_token("prod", MASK, &mut store).unwrap();
        assert_eq!(resolved.token, "abc");
        assert!(!resolved.rotated);
    }

    #[test]
    fn test_masked_token_missing() {
        let mut store = MemoryCredentialStore::new().with_secret("other", TOKEN_USERNAME, "abc");

        let err = resolve_token("prod", MASK, &mut store).unwrap_err();
        assert!(matches!(err, CredentialError::Missing { .. }));
        assert_eq!(
            err.to_string(),
            "Encrypted token was not found for prod, reconfigure its value."
        );
    }

    #[test]
    fn test_clear_token_is_stored() {
        let mut store = MemoryCredentialStore::new();

        let resolved = resolve_token("prod", "new-secret", &mut store).unwrap();
        assert_eq!(resolved.token, "new-secret");
        assert!(resolved.rotated);
        assert_eq!(
            store.lookup("prod", TOKEN_USERNAME).unwrap().as_deref(),
            Some("new-secret")
        );
    }

    #[test]
    fn test_clear_token_replaces_existing() {
        let mut store = MemoryCredentialStore::new().with_secret("prod", TOKEN_USERNAME, "old");

        resolve_token("prod", "new", &mut store).unwrap();
        assert_eq!(store.lookup("prod", TOKEN_USERNAME).unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }
}
