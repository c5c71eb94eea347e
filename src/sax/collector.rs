//! SAX Collector
//!
//! Implements both handler traits to record events for batch inspection.

use super::attributes::Attributes;
use super::events::SaxEvent;
use super::handler::{ContentHandler, ErrorHandler};
use super::parser::XmlParser;
use crate::config::ParserConfig;
use crate::core::encoding::CharDecoder;
use crate::error::{ParseError, ReaderError};

/// Collector that records every event it receives
#[derive(Debug, Default, Clone)]
pub struct EventCollector {
    events: Vec<SaxEvent>,
}

impl EventCollector {
    /// Create a new collector
    pub fn new() -> Self {
        EventCollector {
            events: Vec::with_capacity(32),
        }
    }

    /// Take the collected events
    pub fn take_events(&mut self) -> Vec<SaxEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[SaxEvent] {
        &self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn has_fatal_error(&self) -> bool {
        self.events.iter().any(SaxEvent::is_fatal_error)
    }

    /// The fatal error, if one was reported
    pub fn error(&self) -> Option<&ParseError> {
        self.events.iter().find_map(|event| match event {
            SaxEvent::FatalError(err) => Some(err),
            _ => None,
        })
    }
}

impl ContentHandler for EventCollector {
    fn start_document(&mut self) {
        self.events.push(SaxEvent::StartDocument);
    }

    fn start_element(&mut self, uri: &str, local_name: &str, qname: &str, attributes: &Attributes) {
        self.events.push(SaxEvent::StartElement {
            uri: uri.to_string(),
            local_name: local_name.to_string(),
            qname: qname.to_string(),
            attributes: attributes.clone(),
        });
    }

    fn characters(&mut self, text: &str) {
        self.events.push(SaxEvent::Characters(text.to_string()));
    }

    fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) {
        self.events.push(SaxEvent::EndElement {
            uri: uri.to_string(),
            local_name: local_name.to_string(),
            qname: qname.to_string(),
        });
    }

    fn end_document(&mut self) {
        self.events.push(SaxEvent::EndDocument);
    }
}

impl ErrorHandler for EventCollector {
    fn fatal_error(&mut self, error: &ParseError) {
        self.events.push(SaxEvent::FatalError(error.clone()));
    }
}

/// Parse UTF-8 input in one buffer with the default configuration
pub fn collect_events(input: &[u8]) -> Vec<SaxEvent> {
    let config = ParserConfig::default();
    // a fresh parser only rejects input after it has closed
    collect_events_chunked(std::iter::once(input), &config).unwrap_or_default()
}

/// Parse UTF-8 input delivered as a sequence of chunks
///
/// Fails only if a chunk is fed after the parser closed, which happens once
/// the root element ends or a fatal error was reported.
pub fn collect_events_chunked<'a, I>(
    chunks: I,
    config: &ParserConfig,
) -> Result<Vec<SaxEvent>, ReaderError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut parser = XmlParser::new(config, EventCollector::new());
    let mut decoder = CharDecoder::utf8();
    for chunk in chunks {
        parser.feed(chunk, &mut decoder)?;
    }
    Ok(parser.into_handler().take_events())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_parse() {
        let events = collect_events(b"<root><child/></root>");

        // start doc, start root, start+end child, end root, end doc
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], SaxEvent::StartDocument);
        assert!(events[1].is_start_element());
        assert_eq!(events[5], SaxEvent::EndDocument);
    }

    #[test]
    fn test_with_text() {
        let events = collect_events(b"<a>hello</a>");
        assert_eq!(events.len(), 5);
        assert_eq!(events[2], SaxEvent::Characters("hello".to_string()));
    }

    #[test]
    fn test_with_attributes() {
        let events = collect_events(b"<root id=\"1\" name='test'/>");
        assert_eq!(events.len(), 4);

        if let SaxEvent::StartElement { attributes, .. } = &events[1] {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes.value_of("name"), Some("test"));
        } else {
            panic!("Expected StartElement");
        }
    }

    #[test]
    fn test_fatal_error_recorded() {
        let mut collector = EventCollector::new();
        collector.fatal_error(&ParseError::TextOutsideElement);
        assert!(collector.has_fatal_error());
        assert_eq!(
            collector.error(),
            Some(&ParseError::TextOutsideElement)
        );
        assert_eq!(collector.take_events().len(), 1);
        assert_eq!(collector.event_count(), 0);
    }

    #[test]
    fn test_chunked_feed_after_close() {
        let chunks: [&[u8]; 2] = [b"<a/>", b"<b/>"];
        let result = collect_events_chunked(chunks, &ParserConfig::default());
        assert_eq!(result, Err(ReaderError::Closed));
    }
}
