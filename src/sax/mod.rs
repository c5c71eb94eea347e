//! SAX (Simple API for XML) Module
//!
//! Event-based, namespace-aware parsing of chunked input.
//!
//! ## Architecture
//!
//! ```text
//! bytes ---> Tokenizer ---> XmlParser ---> ContentHandler / ErrorHandler
//!               |               |
//!          CharDecoder   NamespaceResolver
//! ```
//!
//! ## Event Types
//!
//! - `start_document` - before the root element (and again after a restart)
//! - `start_element` - namespace-resolved name plus [`Attributes`]
//! - `characters` - unescaped text inside an element
//! - `end_element` - closing or self-closing tag
//! - `end_document` - the root element closed
//! - `fatal_error` - parsing stopped, reported once
//!
//! [`EventCollector`] records owned [`SaxEvent`]s for batch use.

pub mod attributes;
pub mod collector;
pub mod events;
pub mod handler;
pub mod namespace;
pub mod parser;

pub use attributes::{Attribute, Attributes};
pub use collector::{collect_events, collect_events_chunked, EventCollector};
pub use events::SaxEvent;
pub use handler::{ContentHandler, DefaultHandler, ErrorHandler};
pub use namespace::NamespaceResolver;
pub use parser::{ParserState, XmlParser};
