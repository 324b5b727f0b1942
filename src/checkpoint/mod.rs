//! Checkpoint storage for incremental fetching.
//!
//! A checkpoint is the Unix timestamp (seconds) up to which a website's
//! metrics have already been emitted. The fetcher only talks to the
//! [`CheckpointStore`] trait, so the backing storage can be a directory of
//! files, an in-memory map, or anything else keyed by input and website.

mod file;
mod memory;

pub use file::FileCheckpointStore;
pub use memory::MemoryCheckpointStore;

use std::fmt::{self, Debug, Display};
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Identifies the checkpoint of one website within one input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckpointKey {
    pub input: String,
    pub site_id: u64,
}

impl CheckpointKey {
    pub fn new(input: impl Into<String>, site_id: u64) -> Self {
        Self {
            input: input.into(),
            site_id,
        }
    }
}

impl Display for CheckpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.input, self.site_id)
    }
}

/// Errors from reading or writing checkpoints.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// No checkpoint has been written for this key yet.
    #[error("no checkpoint for {0}")]
    NotFound(CheckpointKey),

    /// The stored value is not an integer timestamp.
    #[error("corrupt checkpoint at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("checkpoint I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Key-value store of per-website checkpoints.
pub trait CheckpointStore: Debug {
    /// Read the checkpoint for `key`.
    ///
    /// Any error means "no usable checkpoint"; callers fall back to their
    /// history window.
    fn load(&self, key: &CheckpointKey) -> Result<i64, CheckpointError>;

    /// Overwrite the checkpoint for `key`.
    fn save(&mut self, key: &CheckpointKey, timestamp: i64) -> Result<(), CheckpointError>;

    /// Remove the checkpoint for `key`. Returns whether one existed.
    fn clear(&mut self, key: &CheckpointKey) -> Result<bool, CheckpointError>;
}
