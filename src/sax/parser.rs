//! Streaming SAX Parser
//!
//! Consumes the tokenizer's token stream and drives a second state machine
//! that recognizes start/end tags, attributes, comments and character data,
//! resolves namespaces and dispatches events to the handler.
//!
//! ## Failure path
//!
//! Every step returns `Result<Flow, ParseError>`. The first error closes the
//! tokenizer and is caught once in [`XmlParser::feed`], which closes the
//! parser, makes sure start-document was delivered and reports the error to
//! [`ErrorHandler::fatal_error`]. No event follows a fatal error.
//!
//! ## Stream restarts
//!
//! XMPP reopens the stream after TLS and SASL negotiation by sending a new
//! XML declaration and root element over the same connection. When restarts
//! are enabled, either trigger clears the element and namespace stacks and
//! the next start tag begins a new document.

use log::{debug, trace};

use super::attributes::{Attribute, Attributes};
use super::handler::{ContentHandler, ErrorHandler};
use super::namespace::{NamespaceFrame, NamespaceResolver};
use crate::config::ParserConfig;
use crate::core::encoding::CharDecoder;
use crate::core::entities::unescape;
use crate::core::tokenizer::{Flow, Token, TokenSink, Tokenizer};
use crate::core::unicode::{is_valid_element_name, is_valid_name, is_xml_whitespace, split_qname};
use crate::error::{ParseError, ReaderError};

/// Current parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Between markup
    Start,
    /// After `<`
    InTag,
    /// Inside `<?...?>`, skipped up to `>`
    InDeclaration,
    /// After `</`
    InEndTag,
    /// After a start tag name or a complete attribute
    AfterStartName,
    /// After an end tag name
    AfterEndName,
    /// After the `/` of a self-closing tag
    InEmptyTag,
    AfterAttributeName,
    AfterAttributeEquals,
    AfterAttributeFirstQuote,
    AfterAttributeValue,
    AfterCommentBang,
    AfterCommentDash1,
    AfterCommentDash2,
    /// Inside comment content
    AfterComment,
    AfterCommentClosingDash1,
    AfterCommentClosingDash2,
    /// Document complete, cancelled or failed
    Closed,
}

/// What asked for a stream restart
#[derive(Debug, Clone, Copy)]
enum RestartTrigger<'a> {
    /// `<?` seen in a tag
    Declaration,
    /// A start tag with the given qualified name
    StartTag(&'a str),
}

/// Parser state shared with the tokenizer callback
#[derive(Debug)]
struct Machine<H> {
    config: ParserConfig,
    handler: H,
    state: ParserState,
    /// Name of the tag being parsed
    qname: String,
    attribute_name: String,
    /// Quote that opened the current attribute value
    quote: u8,
    /// In-progress attributes in document order, values unescaped
    attributes: Vec<(String, String)>,
    /// Open elements as `{uri}qname`
    elements: Vec<String>,
    namespaces: NamespaceResolver,
    sent_start_document: bool,
    /// Set by a fatal error or `close()`; only a new parser recovers
    terminated: bool,
}

impl<H: ContentHandler + ErrorHandler> TokenSink for Machine<H> {
    fn token(&mut self, token: Token<'_>) -> Result<Flow, ParseError> {
        trace!("Parser got token {} in state {:?}", token, self.state);

        match self.state {
            ParserState::Start => match token {
                Token::Control(b'<') => {
                    self.state = ParserState::InTag;
                    self.attributes.clear();
                }
                Token::Text(text) => self.characters(text)?,
                Token::Control(_) => return Err(ParseError::NotWellFormed("markup outside a tag")),
            },
            ParserState::InTag => match token {
                Token::Control(b'/') => self.state = ParserState::InEndTag,
                Token::Control(b'?') => {
                    self.state = ParserState::InDeclaration;
                    if self.should_restart(RestartTrigger::Declaration)? {
                        self.reset_document();
                        return Ok(Flow::Restart);
                    }
                }
                Token::Control(b'!') => {
                    if !self.config.comments_allowed() {
                        return Err(ParseError::CommentsNotAllowed);
                    }
                    self.state = ParserState::AfterCommentBang;
                }
                Token::Text(name) => {
                    if !is_valid_element_name(name) {
                        return Err(ParseError::InvalidName(name.to_string()));
                    }
                    self.qname.clear();
                    self.qname.push_str(name);
                    self.state = ParserState::AfterStartName;
                }
                Token::Control(_) => return Err(ParseError::MalformedStartTag),
            },
            ParserState::InEndTag => match token {
                Token::Text(name) => {
                    self.qname.clear();
                    self.qname.push_str(name);
                    self.state = ParserState::AfterEndName;
                }
                Token::Control(_) => return Err(ParseError::NotWellFormed("missing end tag name")),
            },
            ParserState::AfterStartName => match token {
                Token::Control(b'>') => {
                    self.state = ParserState::Start;
                    return self.start_element();
                }
                Token::Control(b'/') => self.state = ParserState::InEmptyTag,
                Token::Text(name) => {
                    if !is_valid_name(name) {
                        return Err(ParseError::InvalidAttributeName(name.to_string()));
                    }
                    self.attribute_name.clear();
                    self.attribute_name.push_str(name);
                    self.state = ParserState::AfterAttributeName;
                }
                Token::Control(_) => return Err(ParseError::MalformedStartTag),
            },
            ParserState::AfterAttributeName => match token {
                Token::Control(b'=') => self.state = ParserState::AfterAttributeEquals,
                _ => return Err(ParseError::NotWellFormed("expected '=' after attribute name")),
            },
            ParserState::AfterAttributeEquals => match token {
                Token::Control(quote @ (b'"' | b'\'')) => {
                    self.quote = quote;
                    self.state = ParserState::AfterAttributeFirstQuote;
                }
                _ => return Err(ParseError::NotWellFormed("attribute value must be quoted")),
            },
            ParserState::AfterAttributeFirstQuote => match token {
                Token::Text(value) => {
                    let value = unescape(value)?.into_owned();
                    self.put_attribute(value);
                    self.state = ParserState::AfterAttributeValue;
                }
                Token::Control(_) => return Err(ParseError::NotWellFormed("missing attribute value")),
            },
            ParserState::AfterAttributeValue => match token {
                Token::Control(quote) if quote == self.quote => {
                    self.state = ParserState::AfterStartName;
                }
                _ => return Err(ParseError::NotWellFormed("unterminated attribute value")),
            },
            ParserState::AfterEndName => match token {
                Token::Control(b'>') => {
                    self.state = ParserState::Start;
                    return self.end_element();
                }
                _ => return Err(ParseError::NotWellFormed("expected '>' after end tag name")),
            },
            ParserState::InEmptyTag => match token {
                Token::Control(b'>') => {
                    self.state = ParserState::Start;
                    let started = self.start_element()?;
                    return match self.end_element()? {
                        Flow::Close => Ok(Flow::Close),
                        _ => Ok(started),
                    };
                }
                _ => return Err(ParseError::NotWellFormed("expected '>' after '/'")),
            },
            ParserState::AfterCommentBang => match token {
                Token::Control(b'-') => self.state = ParserState::AfterCommentDash1,
                _ => return Err(ParseError::CommentNotWellFormed),
            },
            ParserState::AfterCommentDash1 => match token {
                Token::Control(b'-') => self.state = ParserState::AfterCommentDash2,
                _ => return Err(ParseError::CommentNotWellFormed),
            },
            ParserState::AfterCommentDash2 => match token {
                Token::Control(b'-') => self.state = ParserState::AfterCommentClosingDash1,
                Token::Control(b'>') => return Err(ParseError::CommentNotWellFormed),
                _ => self.state = ParserState::AfterComment,
            },
            ParserState::AfterComment => match token {
                Token::Control(b'-') => self.state = ParserState::AfterCommentClosingDash1,
                Token::Control(b'>') => return Err(ParseError::CommentNotWellFormed),
                _ => {}
            },
            ParserState::AfterCommentClosingDash1 => match token {
                Token::Control(b'-') => self.state = ParserState::AfterCommentClosingDash2,
                _ => return Err(ParseError::CommentNotWellFormed),
            },
            ParserState::AfterCommentClosingDash2 => match token {
                Token::Control(b'>') => self.state = ParserState::Start,
                _ => return Err(ParseError::CommentNotWellFormed),
            },
            ParserState::InDeclaration => {
                if token == Token::Control(b'>') {
                    self.state = ParserState::Start;
                }
            }
            ParserState::Closed => return Ok(Flow::Close),
        }

        Ok(Flow::Continue)
    }
}

impl<H: ContentHandler + ErrorHandler> Machine<H> {
    fn new(config: &ParserConfig, handler: H) -> Self {
        Machine {
            config: config.clone(),
            handler,
            state: ParserState::Start,
            qname: String::new(),
            attribute_name: String::new(),
            quote: b'"',
            attributes: Vec::new(),
            elements: Vec::with_capacity(8),
            namespaces: NamespaceResolver::new(),
            sent_start_document: false,
            terminated: false,
        }
    }

    fn characters(&mut self, text: &str) -> Result<(), ParseError> {
        if !self.elements.is_empty() {
            let text = unescape(text)?;
            trace!("Parser emitting characters {:?}", text);
            self.handler.characters(&text);
            return Ok(());
        }

        // outside the root only whitespace is allowed, but the document
        // has started either way
        self.start_document();
        if is_blank(text) {
            Ok(())
        } else {
            Err(ParseError::TextOutsideElement)
        }
    }

    /// Record the current attribute; a repeated name keeps its first position
    fn put_attribute(&mut self, value: String) {
        let name = &self.attribute_name;
        match self.attributes.iter().position(|(qname, _)| qname == name) {
            Some(index) => self.attributes[index].1 = value,
            None => self.attributes.push((name.clone(), value)),
        }
    }

    /// Decide whether a trigger restarts the stream
    ///
    /// Restarts only happen while an element is open. A declaration with no
    /// open element is a leading declaration and is skipped.
    fn should_restart(&self, trigger: RestartTrigger<'_>) -> Result<bool, ParseError> {
        if self.elements.is_empty() {
            return Ok(false);
        }
        match trigger {
            RestartTrigger::Declaration if self.config.restart_allowed() => Ok(true),
            RestartTrigger::Declaration => Err(ParseError::RestartNotAllowed),
            RestartTrigger::StartTag(qname) => {
                Ok(self.config.restart_allowed() && self.config.restart_qname() == Some(qname))
            }
        }
    }

    /// Forget the open document so the next start tag begins a new one
    fn reset_document(&mut self) {
        trace!("Restarting XML stream");
        self.elements.clear();
        self.namespaces.clear();
        self.sent_start_document = false;
    }

    fn start_document(&mut self) {
        if !self.sent_start_document {
            self.sent_start_document = true;
            self.handler.start_document();
        }
    }

    fn start_element(&mut self) -> Result<Flow, ParseError> {
        trace!("StartElement {}", self.qname);

        let mut flow = Flow::Continue;
        if self.should_restart(RestartTrigger::StartTag(&self.qname))? {
            self.reset_document();
            flow = Flow::Restart;
        }

        if self.elements.is_empty() {
            self.start_document();
        }

        let attributes = std::mem::take(&mut self.attributes);
        let bindings: NamespaceFrame = attributes
            .iter()
            .filter_map(|(qname, value)| {
                declared_prefix(qname).map(|prefix| (prefix.to_string(), value.clone()))
            })
            .collect();
        self.namespaces.push_scope(bindings);

        let mut reported = Vec::with_capacity(attributes.len());
        for (qname, value) in attributes {
            if declared_prefix(&qname).is_some() {
                if self.config.namespace_prefixes() {
                    reported.push(Attribute::new(qname.as_str(), None, qname.as_str(), value));
                }
                continue;
            }
            // unprefixed attributes are in no namespace, whatever the default
            let (prefix, local_name) = split_qname(&qname);
            let uri = if prefix.is_empty() {
                ""
            } else {
                resolve_uri(&self.namespaces, prefix)?
            };
            reported.push(Attribute::new(local_name, Some(uri), qname.as_str(), value));
        }
        let attributes = Attributes::new(reported);

        let (prefix, local_name) = split_qname(&self.qname);
        let uri = resolve_uri(&self.namespaces, prefix)?;
        self.elements.push(fully_qualified_name(uri, &self.qname));
        self.handler
            .start_element(uri, local_name, &self.qname, &attributes);

        Ok(flow)
    }

    fn end_element(&mut self) -> Result<Flow, ParseError> {
        trace!("EndElement {}", self.qname);

        let (prefix, local_name) = split_qname(&self.qname);
        let uri = resolve_uri(&self.namespaces, prefix)?;
        let expected = fully_qualified_name(uri, &self.qname);
        match self.elements.pop() {
            Some(open) if open == expected => {}
            _ => return Err(ParseError::MismatchedEndTag(self.qname.clone())),
        }

        self.handler.end_element(uri, local_name, &self.qname);
        self.namespaces.pop_scope();

        if self.elements.is_empty() {
            self.handler.end_document();
            self.state = ParserState::Closed;
            return Ok(Flow::Close);
        }
        Ok(Flow::Continue)
    }

    /// The single fatal error path
    fn fail(&mut self, error: ParseError) {
        debug!("Fatal error: {}", error);
        self.state = ParserState::Closed;
        self.terminated = true;
        self.start_document();
        self.handler.fatal_error(&error);
    }
}

/// Prefix bound by a namespace declaration attribute, `""` for `xmlns`
fn declared_prefix(qname: &str) -> Option<&str> {
    if qname == "xmlns" {
        Some("")
    } else {
        qname.strip_prefix("xmlns:")
    }
}

/// An unprefixed name without a default namespace is in no namespace
fn resolve_uri<'a>(namespaces: &'a NamespaceResolver, prefix: &str) -> Result<&'a str, ParseError> {
    match namespaces.resolve(prefix) {
        Some(uri) => Ok(uri),
        None if prefix.is_empty() => Ok(""),
        None => Err(ParseError::UndeclaredPrefix(prefix.to_string())),
    }
}

#[inline]
fn fully_qualified_name(uri: &str, qname: &str) -> String {
    format!("{{{}}}{}", uri, qname)
}

#[inline]
fn is_blank(text: &str) -> bool {
    text.bytes().all(is_xml_whitespace)
}

/// Non-blocking XML parser for one input stream
///
/// Owns its tokenizer; the caller owns the character decoder so decoding
/// state survives between buffers.
#[derive(Debug)]
pub struct XmlParser<H> {
    tokenizer: Tokenizer,
    machine: Machine<H>,
}

impl<H: ContentHandler + ErrorHandler> XmlParser<H> {
    /// Create a parser delivering events to `handler`
    pub fn new(config: &ParserConfig, handler: H) -> Self {
        XmlParser {
            tokenizer: Tokenizer::new(),
            machine: Machine::new(config, handler),
        }
    }

    /// Parse the bytes available now
    ///
    /// Data errors go to the error handler, not the return value. Fails
    /// with [`ReaderError::Closed`] once the document has ended, a fatal
    /// error was reported or the parser was closed.
    pub fn feed(&mut self, bytes: &[u8], decoder: &mut CharDecoder) -> Result<(), ReaderError> {
        if self.machine.state == ParserState::Closed {
            return Err(ReaderError::Closed);
        }
        if let Err(err) = self.tokenizer.feed(bytes, decoder, &mut self.machine) {
            self.machine.fail(err);
        }
        Ok(())
    }

    /// Stop parsing. Idempotent; later feeds fail with `Closed`.
    pub fn close(&mut self) {
        self.machine.state = ParserState::Closed;
        self.machine.terminated = true;
        self.tokenizer.close();
    }

    /// Reopen the stream without replacing the parser
    ///
    /// Clears the element and namespace stacks and any partial token. Only
    /// available when restarts are enabled, and not after a fatal error or
    /// `close()`.
    pub fn restart(&mut self) -> Result<(), ReaderError> {
        if !self.machine.config.restart_allowed() {
            return Err(ReaderError::RestartNotAllowed);
        }
        if self.machine.terminated {
            return Err(ReaderError::Closed);
        }
        self.machine.reset_document();
        self.machine.attributes.clear();
        self.machine.state = ParserState::Start;
        self.tokenizer.reset();
        Ok(())
    }

    /// Replace the configuration before any input was fed
    pub(crate) fn set_config(&mut self, config: ParserConfig) {
        self.machine.config = config;
    }

    pub fn is_closed(&self) -> bool {
        self.machine.state == ParserState::Closed
    }

    pub fn state(&self) -> ParserState {
        self.machine.state
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.machine.elements.len()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.machine.config
    }

    pub fn handler(&self) -> &H {
        &self.machine.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.machine.handler
    }

    pub fn into_handler(self) -> H {
        self.machine.handler
    }
}
