//! SAX Event Types
//!
//! Owned copies of the events delivered through the handler traits, for
//! consumers that batch events instead of reacting to callbacks.

use super::attributes::Attributes;
use crate::error::ParseError;

/// A SAX parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaxEvent {
    /// Start of a document (or of a restarted stream)
    StartDocument,

    /// Start of an element
    StartElement {
        /// Resolved namespace URI, empty when the element has none
        uri: String,
        local_name: String,
        qname: String,
        attributes: Attributes,
    },

    /// Unescaped character content
    Characters(String),

    /// End of an element
    EndElement {
        uri: String,
        local_name: String,
        qname: String,
    },

    /// The root element closed
    EndDocument,

    /// Parsing stopped on a fatal error
    FatalError(ParseError),
}

impl SaxEvent {
    /// Check if this is a start element event
    #[inline]
    pub fn is_start_element(&self) -> bool {
        matches!(self, SaxEvent::StartElement { .. })
    }

    /// Check if this is an end element event
    #[inline]
    pub fn is_end_element(&self) -> bool {
        matches!(self, SaxEvent::EndElement { .. })
    }

    /// Check if this is a characters event
    #[inline]
    pub fn is_characters(&self) -> bool {
        matches!(self, SaxEvent::Characters(_))
    }

    #[inline]
    pub fn is_fatal_error(&self) -> bool {
        matches!(self, SaxEvent::FatalError(_))
    }

    /// Get the qualified name if this is a start or end element
    pub fn qname(&self) -> Option<&str> {
        match self {
            SaxEvent::StartElement { qname, .. } | SaxEvent::EndElement { qname, .. } => {
                Some(qname)
            }
            _ => None,
        }
    }

    /// Get the namespace URI if this is a start or end element
    pub fn uri(&self) -> Option<&str> {
        match self {
            SaxEvent::StartElement { uri, .. } | SaxEvent::EndElement { uri, .. } => Some(uri),
            _ => None,
        }
    }
}
