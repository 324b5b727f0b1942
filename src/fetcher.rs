//! Incremental metrics fetcher.
//!
//! One run of an input:
//!
//! 1. resolve the bearer token (masked values come from the credential store)
//! 2. list every monitored website; a failure here ends the run
//! 3. per website, sequentially:
//!    - emit a status event
//!    - fetch the performance graph from the checkpoint (or `history` days
//!      back) up to the current minute
//!    - emit one event per sample and metric line
//!    - advance the checkpoint to the last sample
//!
//! Per-website failures are logged and the website is skipped; nothing is
//! retried within a run. The next scheduled run picks up from the untouched
//! checkpoint.

use std::io;
use std::time::Duration;

use logicmonitor_api::{ApiError, GraphData, Website, WebsitesClient};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::checkpoint::{CheckpointKey, CheckpointStore};
use crate::config::{stanza, InputSettings};
use crate::credentials::{resolve_token, CredentialError, CredentialStore};
use crate::event::{Event, EventSink};
use crate::inputs::InputUpdater;

/// Sourcetype of per-website status events.
pub const STATUS_SOURCETYPE: &str = "logicmonitor:website:status";

/// Legend prefix dropped from metric event sources.
pub const LEGEND_PREFIX: &str = "Response Time - ";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("failed to build API client: {0}")]
    Client(#[source] ApiError),

    #[error("Failed to get websites: {0}")]
    SiteListing(#[source] ApiError),

    #[error("failed to write event: {0}")]
    Sink(#[from] io::Error),
}

/// Collaborators of a run.
pub struct RunContext<'a> {
    pub credentials: &'a mut dyn CredentialStore,
    pub inputs: &'a mut dyn InputUpdater,
    pub checkpoints: &'a mut dyn CheckpointStore,
    pub sink: &'a mut dyn EventSink,
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sites: usize,
    pub status_events: usize,
    pub metric_events: usize,
    /// Websites whose checkpoint already covers the window.
    pub skipped_sites: usize,
    /// Websites whose graph could not be fetched or decoded.
    pub failed_sites: usize,
    pub checkpoints_saved: usize,
    pub token_rotated: bool,
}

/// Fetches new website metrics for one input.
#[derive(Debug, Clone)]
pub struct IncrementalFetcher {
    name: String,
    settings: InputSettings,
    timeout: Duration,
}

impl IncrementalFetcher {
    pub fn new(name: impl Into<String>, settings: InputSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout (default: 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the input once. `now` is the current Unix time in seconds.
    pub async fn run(&self, ctx: &mut RunContext<'_>, now: i64) -> Result<RunSummary, RunError> {
        let end = window_end(now);
        let mut summary = RunSummary::default();

        let resolved = resolve_token(&self.name, &self.settings.token, ctx.credentials)
            .inspect_err(|e| error!(input = %self.name, "{}", e))?;

        if resolved.rotated {
            summary.token_rotated = true;
            if let Err(e) = ctx.inputs.mask_field(&self.name, "token") {
                warn!(input = %self.name, error = %e, "Stored token but could not mask the configured value");
            }
        }

        let client = self.client(&resolved.token).map_err(RunError::Client)?;

        let websites = client.list_websites().await.map_err(|e| {
            match e.status() {
                Some(status) => error!(input = %self.name, "Failed to get websites, status={}", status),
                None => error!(input = %self.name, error = %e, "Failed to get websites"),
            }
            RunError::SiteListing(e)
        })?;

        let source = self.settings.status_source();
        for website in &websites {
            summary.sites += 1;
            self.process_website(&client, website, &source, now, end, ctx, &mut summary)
                .await?;
        }

        info!(
            input = %self.name,
            sites = summary.sites,
            metric_events = summary.metric_events,
            skipped = summary.skipped_sites,
            failed = summary.failed_sites,
            "Run complete"
        );
        Ok(summary)
    }

    fn client(&self, token: &str) -> Result<WebsitesClient, ApiError> {
        let mut builder = WebsitesClient::builder()
            .org(&self.settings.org)
            .token(token)
            .timeout(self.timeout);
        if let Some(endpoint) = &self.settings.endpoint {
            builder = builder.endpoint(endpoint);
        }
        builder.build()
    }

    #[allow(clippy::too_many_arguments)]
    async fn process_website(
        &self,
        client: &WebsitesClient,
        website: &Website,
        source: &str,
        now: i64,
        end: i64,
        ctx: &mut RunContext<'_>,
        summary: &mut RunSummary,
    ) -> Result<(), RunError> {
        let stanza = stanza(&self.name);

        ctx.sink
            .write_event(&status_event(website, source).with_stanza(&stanza))?;
        summary.status_events += 1;

        let key = CheckpointKey::new(&self.name, website.id);
        let previous = match ctx.checkpoints.load(&key) {
            Ok(timestamp) => Some(timestamp),
            Err(e) => {
                info!(reason = %e, "Checkpoint not found for {}", website.name);
                None
            }
        };
        let start = previous.unwrap_or_else(|| history_start(now, self.settings.history));

        if start >= end {
            info!(start, end, "Skipping {}", website.domain);
            summary.skipped_sites += 1;
            return Ok(());
        }

        info!("Will grab events for {} from {} to {}", website.domain, start, end);

        let graph = match client.performance_data(website.id, start, end).await {
            Ok(graph) => graph,
            Err(ApiError::MalformedSeries { reason, body }) => {
                warn!(site = %website.name, reason = %reason, "{}", body);
                summary.failed_sites += 1;
                return Ok(());
            }
            Err(e) => {
                match e.status() {
                    Some(status) => error!(
                        "Failed to get website {} {}, status={}",
                        website.name, website.domain, status
                    ),
                    None => error!(
                        error = %e,
                        "Failed to get website {} {}", website.name, website.domain
                    ),
                }
                summary.failed_sites += 1;
                return Ok(());
            }
        };

        for event in metric_events(website, &graph) {
            ctx.sink.write_event(&event.with_stanza(&stanza))?;
            summary.metric_events += 1;
        }

        let Some(last_ms) = graph.last_timestamp_ms() else {
            debug!(site = %website.name, "Empty series, checkpoint unchanged");
            return Ok(());
        };

        let checkpoint = next_checkpoint(previous, last_ms);
        match ctx.checkpoints.save(&key, checkpoint) {
            Ok(()) => {
                summary.checkpoints_saved += 1;
                debug!(site = %website.name, checkpoint, "Checkpoint saved");
            }
            Err(e) => error!(site = %website.name, error = %e, "Failed to save checkpoint"),
        }
        Ok(())
    }
}

/// End of the fetch window: `now` truncated to the minute.
pub fn window_end(now: i64) -> i64 {
    now - now.rem_euclid(60)
}

/// Start of the fetch window for a website without a checkpoint.
pub fn history_start(now: i64, history_days: f64) -> i64 {
    now - (history_days * SECONDS_PER_DAY) as i64
}

/// Checkpoint after a series ending at `last_ms`. Never moves backwards.
pub fn next_checkpoint(previous: Option<i64>, last_ms: i64) -> i64 {
    let fetched = last_ms.div_euclid(1000);
    previous.map_or(fetched, |previous| previous.max(fetched))
}

/// Event `source` for a metric line.
pub fn metric_source(legend: &str) -> &str {
    legend.strip_prefix(LEGEND_PREFIX).unwrap_or(legend)
}

/// The status event emitted for every website.
pub fn status_event(website: &Website, source: &str) -> Event {
    Event::new(
        &website.domain,
        source,
        format!(
            "status={} alert={} name=\"{}\"",
            website.status, website.alert_status, website.name
        ),
    )
    .with_sourcetype(STATUS_SOURCETYPE)
}

/// One event per sample and line, in timestamp order. Null samples are skipped.
pub fn metric_events(website: &Website, graph: &GraphData) -> Vec<Event> {
    let mut events = Vec::with_capacity(graph.timestamps.len() * graph.lines.len());
    for (index, timestamp) in graph.timestamps.iter().enumerate() {
        for line in &graph.lines {
            let Some(value) = line.data.get(index).copied().flatten() else {
                continue;
            };
            events.push(
                Event::new(&website.domain, metric_source(&line.legend), value.to_string())
                    .with_time(*timestamp as f64 / 1000.0),
            );
        }
    }
    events
}
