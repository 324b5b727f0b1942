//! Runtime configuration.
//!
//! Settings come from an optional TOML file layered with `LMW_*` environment
//! variables (`__` separates nesting levels, e.g.
//! `LMW_INPUTS__PROD__TOKEN`).
//!
//! ```toml
//! checkpoint_dir = "/var/lib/lm-websites/checkpoints"
//! credential_file = "/var/lib/lm-websites/credentials.json"
//!
//! [log]
//! level = "info"
//!
//! [inputs.prod]
//! org = "acme"
//! token = "lmb_xxx"
//! history = 7
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogConfig;

/// Input kind, used as the stanza prefix (`kind://name`).
pub const INPUT_KIND: &str = "logic_monitor_websites";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "LMW";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("input '{input}' is invalid: {reason}")]
    Invalid { input: String, reason: String },
}

/// Output format of the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Modular-input streaming XML.
    #[default]
    Xml,
    /// Newline-delimited JSON.
    Json,
}

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding per-website checkpoint files.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// JSON file holding stored bearer tokens.
    #[serde(default = "default_credential_file")]
    pub credential_file: PathBuf,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub log: LogConfig,

    /// Configured inputs, keyed by input name.
    #[serde(default)]
    pub inputs: BTreeMap<String, InputSettings>,
}

/// One input stanza.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputSettings {
    /// Organisation subdomain (`{org}.logicmonitor.com`).
    pub org: String,

    /// Bearer token, or the mask sentinel once it has been stored.
    pub token: String,

    /// Days of history fetched for a website without a checkpoint.
    #[serde(default = "default_history")]
    pub history: f64,

    /// REST base URL override.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub disabled: bool,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn default_credential_file() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_request_timeout() -> u64 {
    30
}

pub fn default_history() -> f64 {
    7.0
}

impl InputSettings {
    /// Input with default history and no endpoint override.
    pub fn new(org: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            token: token.into(),
            history: default_history(),
            endpoint: None,
            disabled: false,
        }
    }

    /// `source` of status events.
    pub fn status_source(&self) -> String {
        format!("{}.logicmonitor.com", self.org)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            input: name.to_string(),
            reason: reason.to_string(),
        };

        if self.org.trim().is_empty() && self.endpoint.is_none() {
            return Err(invalid("org must not be empty"));
        }
        if self.token.is_empty() {
            return Err(invalid("token must not be empty"));
        }
        if !self.history.is_finite() || self.history < 0.0 {
            return Err(invalid("history must be a non-negative number of days"));
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string. Environment overrides are not applied.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, input) in &self.inputs {
            input.validate(name)?;
        }
        Ok(())
    }
}

/// Stanza name of an input.
pub fn stanza(name: &str) -> String {
    format!("{}://{}", INPUT_KIND, name)
}
