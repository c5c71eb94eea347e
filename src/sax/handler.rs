//! Event Handler Traits
//!
//! Implement these traits to receive parse events. Every method has an empty
//! default, so a handler only overrides what it needs.
//!
//! Event order for one document: `start_document`, then properly nested
//! `start_element` / `characters` / `end_element`, then `end_document`.
//! A fatal error may cut the sequence short; `start_document` is always
//! delivered before `fatal_error`.

use super::attributes::Attributes;
use crate::error::ParseError;

/// Receiver of document content events
pub trait ContentHandler {
    /// Called once per document, before the first element
    fn start_document(&mut self) {}

    /// Called when an element starts
    ///
    /// # Arguments
    /// * `uri` - Resolved namespace URI, empty when the element has none
    /// * `local_name` - Name without prefix
    /// * `qname` - Name as written, including any prefix
    /// * `attributes` - Attributes other than namespace declarations
    fn start_element(
        &mut self,
        _uri: &str,
        _local_name: &str,
        _qname: &str,
        _attributes: &Attributes,
    ) {
    }

    /// Called for unescaped character content inside an element
    fn characters(&mut self, _text: &str) {}

    /// Called when an element ends, including self-closing elements
    fn end_element(&mut self, _uri: &str, _local_name: &str, _qname: &str) {}

    /// Called when the root element closes
    fn end_document(&mut self) {}
}

/// Receiver of fatal parse errors
pub trait ErrorHandler {
    /// Called at most once per session; no events follow
    fn fatal_error(&mut self, _error: &ParseError) {}
}

/// Handler that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandler;

impl ContentHandler for DefaultHandler {}

impl ErrorHandler for DefaultHandler {}

impl<T: ContentHandler + ?Sized> ContentHandler for &mut T {
    fn start_document(&mut self) {
        (**self).start_document();
    }

    fn start_element(&mut self, uri: &str, local_name: &str, qname: &str, attributes: &Attributes) {
        (**self).start_element(uri, local_name, qname, attributes);
    }

    fn characters(&mut self, text: &str) {
        (**self).characters(text);
    }

    fn end_element(&mut self, uri: &str, local_name: &str, qname: &str) {
        (**self).end_element(uri, local_name, qname);
    }

    fn end_document(&mut self) {
        (**self).end_document();
    }
}

impl<T: ErrorHandler + ?Sized> ErrorHandler for &mut T {
    fn fatal_error(&mut self, error: &ParseError) {
        (**self).fatal_error(error);
    }
}
