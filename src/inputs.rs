//! Write-back of input settings.
//!
//! Once a clear token has been moved into the credential store, the
//! configured value is replaced by [`MASK`] so the secret is not kept in
//! the configuration file.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::credentials::MASK;

#[derive(Debug, Error)]
pub enum InputUpdateError {
    #[error("input '{0}' not found in configuration file")]
    UnknownInput(String),

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration file: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Updates fields of a configured input.
pub trait InputUpdater: Debug {
    /// Replace `field` of input `name` with the mask sentinel.
    fn mask_field(&mut self, name: &str, field: &str) -> Result<(), InputUpdateError>;
}

/// Rewrites `[inputs.<name>]` tables in a TOML configuration file.
///
/// The file is parsed and serialized again, so every setting survives but
/// comments and the original layout do not. Keep commented configuration
/// elsewhere, or supply the token through `LMW_INPUTS__<NAME>__TOKEN` and
/// run without a writable config file.
#[derive(Debug, Clone)]
pub struct TomlInputUpdater {
    path: PathBuf,
}

impl TomlInputUpdater {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl InputUpdater for TomlInputUpdater {
    fn mask_field(&mut self, name: &str, field: &str) -> Result<(), InputUpdateError> {
        let io_err = |source| InputUpdateError::Io {
            path: self.path.clone(),
            source,
        };

        let content = fs::read_to_string(&self.path).map_err(io_err)?;
        let mut doc: toml::Table = content.parse()?;

        let input = doc
            .get_mut("inputs")
            .and_then(toml::Value::as_table_mut)
            .and_then(|inputs| inputs.get_mut(name))
            .and_then(toml::Value::as_table_mut)
            .ok_or_else(|| InputUpdateError::UnknownInput(name.to_string()))?;
        input.insert(field.to_string(), toml::Value::String(MASK.to_string()));

        let rendered = toml::to_string_pretty(&doc)?;

        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, rendered).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// For settings that do not come from a writable file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInputUpdater;

impl InputUpdater for NoopInputUpdater {
    fn mask_field(&mut self, _name: &str, _field: &str) -> Result<(), InputUpdateError> {
        Ok(())
    }
}
