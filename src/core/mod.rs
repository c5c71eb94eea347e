//! Core XML parsing primitives
//!
//! This module contains the building blocks the parser is assembled from:
//! - Tokenizer: byte-level state machine that survives chunk boundaries
//! - Encoding: per-token character decoding on top of encoding_rs
//! - Entities: predefined entity and character reference decoding
//! - Unicode: XML 1.0 Name production and qualified name helpers

pub mod encoding;
pub mod entities;
pub mod tokenizer;
pub mod unicode;
