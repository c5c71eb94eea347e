//! Error Types
//!
//! Three families of errors, reported through different channels:
//!
//! - [`ParseError`]: data-driven failures (bad names, mismatched tags,
//!   undeclared prefixes, ...). These end the session and are delivered once
//!   through [`ErrorHandler::fatal_error`](crate::sax::ErrorHandler::fatal_error).
//! - [`ConfigError`]: misuse of the feature/property surface.
//! - [`ReaderError`]: misuse of the session itself, returned to the caller
//!   of `feed`/`parse`.

use thiserror::Error;

/// Broad classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid names, bad character references, broken attribute syntax
    MalformedToken,
    /// Mismatched tags, text outside the root, disallowed comments or restarts
    Structural,
    /// Use of an undeclared prefix
    Namespace,
}

/// Fatal, data-driven parse error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid element name: {0}")]
    InvalidName(String),

    #[error("Invalid attribute name: {0}")]
    InvalidAttributeName(String),

    #[error("Not well-formed start tag")]
    MalformedStartTag,

    #[error("Not well-formed: {0}")]
    NotWellFormed(&'static str),

    #[error("Comment not well-formed")]
    CommentNotWellFormed,

    #[error("Comments not allowed")]
    CommentsNotAllowed,

    #[error("Text only allowed in element")]
    TextOutsideElement,

    #[error("Undeclared namespace prefix: {0}")]
    UndeclaredPrefix(String),

    #[error("Invalid element name {0}: does not match the open element")]
    MismatchedEndTag(String),

    #[error("Invalid character reference: {0}")]
    InvalidCharacterReference(String),

    #[error("Malformed input: {0}")]
    Decode(String),

    #[error("XML declaration inside an element, stream restart not allowed")]
    RestartNotAllowed,
}

impl ParseError {
    /// Which part of the error taxonomy this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::UndeclaredPrefix(_) => ErrorCategory::Namespace,
            ParseError::MismatchedEndTag(_)
            | ParseError::TextOutsideElement
            | ParseError::CommentsNotAllowed
            | ParseError::RestartNotAllowed => ErrorCategory::Structural,
            ParseError::InvalidName(_)
            | ParseError::InvalidAttributeName(_)
            | ParseError::MalformedStartTag
            | ParseError::NotWellFormed(_)
            | ParseError::CommentNotWellFormed
            | ParseError::InvalidCharacterReference(_)
            | ParseError::Decode(_) => ErrorCategory::MalformedToken,
        }
    }
}

/// Feature/property misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Feature not supported: {0}")]
    UnsupportedFeature(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Feature or property can not be set during parsing")]
    ParsingStarted,

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Encoding not supported by the byte tokenizer: {0}")]
    UnsupportedEncoding(String),
}

/// Session-state errors returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Parser is closed")]
    Closed,

    #[error("Stream restarts are not enabled")]
    RestartNotAllowed,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ParseError::UndeclaredPrefix("p".into()).category(),
            ErrorCategory::Namespace
        );
        assert_eq!(
            ParseError::MismatchedEndTag("a".into()).category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ParseError::InvalidName("1a".into()).category(),
            ErrorCategory::MalformedToken
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ParseError::UndeclaredPrefix("p".into()).to_string(),
            "Undeclared namespace prefix: p"
        );
        assert_eq!(ReaderError::Closed.to_string(), "Parser is closed");
        let err: ReaderError = ConfigError::ParsingStarted.into();
        assert_eq!(
            err.to_string(),
            "Feature or property can not be set during parsing"
        );
    }
}
