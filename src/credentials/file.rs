//! JSON file credential store.
//!
//! Layout: `{"<realm>": {"<username>": "<secret>"}}`. The whole file is
//! rewritten on every change, through a temporary sibling renamed into place.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{CredentialError, CredentialStore};

type Secrets = BTreeMap<String, BTreeMap<String, String>>;

pub struct FileCredentialStore {
    path: PathBuf,
    secrets: Secrets,
}

impl FileCredentialStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CredentialError> {
        let path = path.as_ref().to_path_buf();
        let secrets = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Secrets::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| CredentialError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Secrets::new(),
            Err(source) => return Err(CredentialError::Io { path, source }),
        };

        Ok(Self { path, secrets })
    }

    fn persist(&self) -> Result<(), CredentialError> {
        let json = serde_json::to_string_pretty(&self.secrets).map_err(|e| {
            CredentialError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        write_private(&self.path, json.as_bytes()).map_err(|source| CredentialError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn lookup(&self, realm: &str, username: &str) -> Result<Option<String>, CredentialError> {
        Ok(self
            .secrets
            .get(realm)
            .and_then(|users| users.get(username))
            .cloned())
    }

    fn create(&mut self, realm: &str, username: &str, secret: &str) -> Result<(), CredentialError> {
        self.secrets
            .entry(realm.to_string())
            .or_default()
            .insert(username.to_string(), secret.to_string());
        self.persist()
    }

    fn delete(&mut self, realm: &str, username: &str) -> Result<bool, CredentialError> {
        let Some(users) = self.secrets.get_mut(realm) else {
            return Ok(false);
        };
        let removed = users.remove(username).is_some();
        if users.is_empty() {
            self.secrets.remove(realm);
        }
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}

impl fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .field("realms", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Replace `path` with `contents`, readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp)?;
    // `mode` only applies on creation; a stale temp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)
}
