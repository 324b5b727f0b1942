//! # lm-websites-input
//!
//! Incremental ingestion of LogicMonitor website monitoring data.
//!
//! Each run lists the websites of an organisation, emits one status event
//! per website and one event per response-time sample, and remembers per
//! website how far it has read so the next run only fetches new samples.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐     ┌─────────────┐
//! │ config       │────▶│ fetcher            │────▶│ event sink  │──▶ stdout
//! │ (settings)   │     │ (per-site loop)    │     │ (xml/json)  │
//! └──────────────┘     └──┬───────┬───────┬─┘     └─────────────┘
//!                         │       │       │
//!                         ▼       ▼       ▼
//!               credentials  checkpoint  logicmonitor-api
//!               (token store) (per site)  (REST client)
//! ```
//!
//! - **[`config`]**: settings file and environment overrides
//! - **[`credentials`]**: [`CredentialStore`] trait and bearer-token resolution
//! - **[`inputs`]**: masking the configured token once it is stored
//! - **[`checkpoint`]**: [`CheckpointStore`] trait with file and memory backends
//! - **[`event`]**: [`Event`] and the [`EventSink`] wire formats
//! - **[`fetcher`]**: the incremental fetch loop
//! - **[`scheme`]**: introspection scheme for the host framework
//!
//! ## Usage
//!
//! ```bash
//! # Run every configured input once
//! lm-websites run --config lm-websites.toml
//!
//! # Print the introspection scheme
//! lm-websites scheme
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use lm_websites_input::{
//!     CollectingSink, IncrementalFetcher, InputSettings, MemoryCheckpointStore,
//!     MemoryCredentialStore, NoopInputUpdater, RunContext,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let fetcher = IncrementalFetcher::new("prod", InputSettings::new("acme", "lmb_xxx"));
//!
//! let mut credentials = MemoryCredentialStore::new();
//! let mut inputs = NoopInputUpdater;
//! let mut checkpoints = MemoryCheckpointStore::new();
//! let mut sink = CollectingSink::new();
//! let mut ctx = RunContext {
//!     credentials: &mut credentials,
//!     inputs: &mut inputs,
//!     checkpoints: &mut checkpoints,
//!     sink: &mut sink,
//! };
//!
//! let summary = fetcher.run(&mut ctx, 1_700_000_000).await.unwrap();
//! println!("{} metric events", summary.metric_events);
//! # });
//! ```

pub mod checkpoint;
pub mod config;
pub mod credentials;
pub mod event;
pub mod fetcher;
pub mod inputs;
pub mod logging;
pub mod scheme;

pub use checkpoint::{
    CheckpointError, CheckpointKey, CheckpointStore, FileCheckpointStore, MemoryCheckpointStore,
};
pub use config::{ConfigError, InputSettings, OutputFormat, Settings};
pub use credentials::{
    resolve_token, CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    ResolvedToken, MASK,
};
pub use event::{CollectingSink, Event, EventSink, JsonLinesWriter, XmlStreamWriter};
pub use fetcher::{IncrementalFetcher, RunContext, RunError, RunSummary};
pub use inputs::{InputUpdateError, InputUpdater, NoopInputUpdater, TomlInputUpdater};
pub use scheme::Scheme;
