//! Events and the sinks that carry them to the ingestion pipeline.
//!
//! The fetcher produces [`Event`]s and hands them to an [`EventSink`]. Two
//! wire formats are provided:
//!
//! - [`XmlStreamWriter`] - the modular-input streaming XML format
//!   (`<stream><event>...</event></stream>`)
//! - [`JsonLinesWriter`] - one JSON object per line
//!
//! [`CollectingSink`] keeps events in memory for embedding and tests.

mod json;
pub(crate) mod xml;

pub use json::JsonLinesWriter;
pub use xml::XmlStreamWriter;

use std::io;

use serde::Serialize;

/// One record for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Input stanza the event belongs to (`kind://name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stanza: Option<String>,
    /// Event time in Unix seconds. `None` lets the pipeline stamp it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub host: String,
    pub source: String,
    /// `None` keeps the writer's default sourcetype.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcetype: Option<String>,
    pub data: String,
}

impl Event {
    pub fn new(host: impl Into<String>, source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            stanza: None,
            time: None,
            host: host.into(),
            source: source.into(),
            sourcetype: None,
            data: data.into(),
        }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_sourcetype(mut self, sourcetype: impl Into<String>) -> Self {
        self.sourcetype = Some(sourcetype.into());
        self
    }

    pub fn with_stanza(mut self, stanza: impl Into<String>) -> Self {
        self.stanza = Some(stanza.into());
        self
    }
}

/// Destination for events.
pub trait EventSink {
    fn write_event(&mut self, event: &Event) -> io::Result<()>;

    /// Flush and terminate the stream. Called once, after the last event.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub events: Vec<Event>,
    pub finished: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events carrying the given sourcetype.
    pub fn with_sourcetype<'a>(&'a self, sourcetype: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events
            .iter()
            .filter(move |e| e.sourcetype.as_deref() == Some(sourcetype))
    }
}

impl EventSink for CollectingSink {
    fn write_event(&mut self, event: &Event) -> io::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
