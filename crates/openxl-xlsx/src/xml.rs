//! Shared XML helpers for part readers and writers

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape text for use in element content or attribute values
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Event reader over one in-memory part that enforces a single root element
/// of the expected name and a balanced document.
pub(crate) struct PartReader<'a> {
    part: &'a str,
    root: &'static str,
    reader: Reader<&'a [u8]>,
    depth: usize,
    started: bool,
}

impl<'a> PartReader<'a> {
    pub(crate) fn new(part: &'a str, bytes: &'a [u8], root: &'static str) -> Self {
        Self {
            part,
            root,
            reader: Reader::from_reader(bytes),
            depth: 0,
            started: false,
        }
    }

    /// Enable whitespace trimming for parts where text content is not data
    pub(crate) fn trim_text(mut self) -> Self {
        self.reader.trim_text(true);
        self
    }

    pub(crate) fn next(&mut self) -> XlsxResult<Event<'a>> {
        let event = self.reader.read_event()?;

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if !self.started {
                    if e.local_name().as_ref() != self.root.as_bytes() {
                        return Err(self.error(format!(
                            "expected root element <{}>, found <{}>",
                            self.root,
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )));
                    }
                    self.started = true;
                } else if self.depth == 0 {
                    return Err(self.error("content after the root element"));
                }
                if matches!(event, Event::Start(_)) {
                    self.depth += 1;
                }
            }
            Event::End(_) => {
                self.depth = self.depth.saturating_sub(1);
            }
            Event::Eof => {
                if !self.started {
                    return Err(self.error(format!("missing root element <{}>", self.root)));
                }
                if self.depth > 0 {
                    return Err(self.error("unexpected end of document"));
                }
            }
            _ => {}
        }

        Ok(event)
    }

    pub(crate) fn error<M: Into<String>>(&self, message: M) -> XlsxError {
        XlsxError::parse(self.part, message)
    }
}

/// Value of the attribute whose qualified name is `key`
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Value of a namespace-prefixed attribute by local name (e.g. `r:id`
/// under whatever prefix the producer chose)
pub(crate) fn prefixed_attr(e: &BytesStart<'_>, local: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Unescaped content of a text event
pub(crate) fn text(e: &BytesText<'_>) -> XlsxResult<String> {
    Ok(e.unescape()?.into_owned())
}
