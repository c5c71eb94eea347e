//! Non-blocking XML Reader
//!
//! Accepts feature and property settings until the first buffer is parsed,
//! then freezes them and forwards every buffer to the parser.

use crate::config::{ConfigBuilder, ParserConfig};
use crate::core::encoding::CharDecoder;
use crate::error::{ConfigError, ReaderError};
use crate::sax::handler::{ContentHandler, ErrorHandler};
use crate::sax::parser::XmlParser;

/// Reader for one input stream
#[derive(Debug)]
pub struct NonBlockingXmlReader<H> {
    builder: ConfigBuilder,
    parser: XmlParser<H>,
    started: bool,
}

impl<H: ContentHandler + ErrorHandler> NonBlockingXmlReader<H> {
    /// Create a reader with the default configuration
    pub fn new(handler: H) -> Self {
        Self::with_config(ParserConfig::default(), handler)
    }

    /// Create a reader starting from `config`
    pub fn with_config(config: ParserConfig, handler: H) -> Self {
        NonBlockingXmlReader {
            parser: XmlParser::new(&config, handler),
            builder: ConfigBuilder::from(config),
            started: false,
        }
    }

    pub fn set_feature(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.ensure_not_started()?;
        self.builder.set_feature(name, value)?;
        self.apply_config();
        Ok(())
    }

    pub fn feature(&self, name: &str) -> Result<bool, ConfigError> {
        self.builder.feature(name)
    }

    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.ensure_not_started()?;
        self.builder.set_property(name, value)?;
        self.apply_config();
        Ok(())
    }

    pub fn property(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        self.builder.property(name)
    }

    /// Parse the bytes available now
    ///
    /// Returns as soon as the bytes are consumed; a partial token is kept
    /// for the next call. Data errors are reported to the handler.
    pub fn parse(&mut self, bytes: &[u8], decoder: &mut CharDecoder) -> Result<(), ReaderError> {
        self.started = true;
        self.parser.feed(bytes, decoder)
    }

    /// Stop parsing. Idempotent.
    pub fn close(&mut self) {
        self.parser.close();
    }

    /// Reopen the stream, see [`XmlParser::restart`]
    pub fn restart(&mut self) -> Result<(), ReaderError> {
        self.parser.restart()
    }

    pub fn is_closed(&self) -> bool {
        self.parser.is_closed()
    }

    /// Whether the configuration is frozen
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &ParserConfig {
        self.parser.config()
    }

    pub fn handler(&self) -> &H {
        self.parser.handler()
    }

    pub fn handler_mut(&mut self) -> &mut H {
        self.parser.handler_mut()
    }

    /// Swap the event handler, returning the previous one
    pub fn set_handler(&mut self, handler: H) -> H {
        std::mem::replace(self.parser.handler_mut(), handler)
    }

    pub fn into_handler(self) -> H {
        self.parser.into_handler()
    }

    fn ensure_not_started(&self) -> Result<(), ConfigError> {
        if self.started {
            Err(ConfigError::ParsingStarted)
        } else {
            Ok(())
        }
    }

    fn apply_config(&mut self) {
        self.parser.set_config(self.builder.clone().build());
    }
}

impl<H: ContentHandler + ErrorHandler + Default> Default for NonBlockingXmlReader<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FEATURE_COMMENTS_ALLOWED, FEATURE_RESTART_ALLOWED, PROPERTY_RESTART_QNAME};
    use crate::error::ParseError;
    use crate::sax::collector::EventCollector;

    #[test]
    fn test_defaults() {
        let reader = NonBlockingXmlReader::new(EventCollector::new());
        assert_eq!(reader.feature(FEATURE_COMMENTS_ALLOWED), Ok(true));
        assert_eq!(reader.feature(FEATURE_RESTART_ALLOWED), Ok(false));
        assert_eq!(reader.property(PROPERTY_RESTART_QNAME), Ok(None));
        assert!(!reader.is_started());
    }

    #[test]
    fn test_settings_reach_parser() {
        let mut reader = NonBlockingXmlReader::new(EventCollector::new());
        reader.set_feature(FEATURE_COMMENTS_ALLOWED, false).unwrap();

        let mut decoder = CharDecoder::utf8();
        reader.parse(b"<a><!-- c --></a>", &mut decoder).unwrap();
        assert_eq!(
            reader.handler().error(),
            Some(&ParseError::CommentsNotAllowed)
        );
    }

    #[test]
    fn test_settings_frozen_after_parse() {
        let mut reader = NonBlockingXmlReader::new(EventCollector::new());
        let mut decoder = CharDecoder::utf8();
        reader.parse(b"<a", &mut decoder).unwrap();

        assert_eq!(
            reader.set_feature(FEATURE_COMMENTS_ALLOWED, false),
            Err(ConfigError::ParsingStarted)
        );
        assert_eq!(
            reader.set_property(PROPERTY_RESTART_QNAME, "a"),
            Err(ConfigError::ParsingStarted)
        );
        assert_eq!(reader.feature(FEATURE_COMMENTS_ALLOWED), Ok(true));
    }

    #[test]
    fn test_parse_after_close() {
        let mut reader = NonBlockingXmlReader::new(EventCollector::new());
        let mut decoder = CharDecoder::utf8();
        reader.close();
        assert_eq!(
            reader.parse(b"<a/>", &mut decoder),
            Err(ReaderError::Closed)
        );
    }

    #[test]
    fn test_set_handler() {
        let mut reader: NonBlockingXmlReader<EventCollector> = NonBlockingXmlReader::default();
        let mut decoder = CharDecoder::utf8();
        reader.parse(b"<a>", &mut decoder).unwrap();

        let previous = reader.set_handler(EventCollector::new());
        assert_eq!(previous.event_count(), 2);
        reader.parse(b"</a>", &mut decoder).unwrap();
        assert_eq!(reader.into_handler().event_count(), 2);
    }
}
