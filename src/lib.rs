//! nbxml - non-blocking, streaming XML parsing for protocol streams
//!
//! Bytes arrive in arbitrary chunks (typically straight from a socket) and
//! are parsed as far as they go; a name, attribute value or multi-byte
//! character cut by a chunk boundary is completed by the next buffer. Events
//! are pushed synchronously to a SAX-style handler.
//!
//! Layers:
//! - Tokenizer: bytes to structural characters and decoded text runs
//! - Parser: tokens to namespace-resolved element events
//! - Reader: configure-then-feed adapter with SAX feature/property names
//!
//! The accepted subset is what XMPP streams use: elements, attributes,
//! namespaces, text and optional comments. XML declarations are skipped or
//! restart the stream; there is no DTD, CDATA or processing instruction
//! support.
//!
//! ```
//! use nbxml::{CharDecoder, EventCollector, NonBlockingXmlReader, SaxEvent};
//!
//! let mut reader = NonBlockingXmlReader::new(EventCollector::new());
//! let mut decoder = CharDecoder::utf8();
//!
//! reader.parse(b"<stream xmlns='jabber:client'><mes", &mut decoder).unwrap();
//! reader.parse(b"sage to='a@b'>hi</message></stream>", &mut decoder).unwrap();
//!
//! let events = reader.handler().events();
//! assert_eq!(events[0], SaxEvent::StartDocument);
//! assert_eq!(events[2].qname(), Some("message"));
//! assert_eq!(events[2].uri(), Some("jabber:client"));
//! assert_eq!(events[3], SaxEvent::Characters("hi".to_string()));
//! assert!(reader.is_closed());
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod reader;
pub mod sax;

pub use config::{ConfigBuilder, ParserConfig};
pub use crate::core::encoding::CharDecoder;
pub use error::{ConfigError, ErrorCategory, ParseError, ReaderError};
pub use reader::NonBlockingXmlReader;
pub use sax::{
    Attribute, Attributes, ContentHandler, DefaultHandler, ErrorHandler, EventCollector,
    SaxEvent, XmlParser,
};
