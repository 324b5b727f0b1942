//! Streaming XML event writer.

use std::io::{self, Write};

use super::{Event, EventSink};

/// Writes events in the modular-input streaming XML format.
///
/// The `<stream>` element is opened before the first event and closed by
/// [`EventSink::finish`]. A stream with no events still produces
/// `<stream></stream>` on finish.
#[derive(Debug)]
pub struct XmlStreamWriter<W: Write> {
    out: W,
    header_written: bool,
    finished: bool,
}

impl<W: Write> XmlStreamWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.out.write_all(b"<stream>")?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> EventSink for XmlStreamWriter<W> {
    fn write_event(&mut self, event: &Event) -> io::Result<()> {
        self.ensure_header()?;

        let mut xml = String::from("<event");
        if let Some(stanza) = &event.stanza {
            xml.push_str(&format!(" stanza=\"{}\"", escape(stanza)));
        }
        xml.push_str(" unbroken=\"1\">");

        if let Some(time) = event.time {
            xml.push_str(&format!("<time>{:.3}</time>", time));
        }
        push_element(&mut xml, "source", &event.source);
        if let Some(sourcetype) = &event.sourcetype {
            push_element(&mut xml, "sourcetype", sourcetype);
        }
        push_element(&mut xml, "host", &event.host);
        push_element(&mut xml, "data", &event.data);
        xml.push_str("<done/></event>");

        self.out.write_all(xml.as_bytes())?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.ensure_header()?;
        self.out.write_all(b"</stream>")?;
        self.finished = true;
        self.out.flush()
    }
}

fn push_element(xml: &mut String, name: &str, value: &str) {
    xml.push_str(&format!("<{name}>{}</{name}>", escape(value)));
}

/// Escape the five XML special characters.
pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
