//! XML Reader Module
//!
//! - NonBlockingXmlReader: configure-then-feed adapter over the parser

pub mod nonblocking;

pub use nonblocking::NonBlockingXmlReader;
