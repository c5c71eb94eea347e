//! XML Tokenizer - byte-level state machine for chunked input
//!
//! Splits incoming bytes into lexical tokens:
//! - Structural characters: `<` `>` `/` `=` `!` `?` `-` `"` `'`
//! - Decoded text runs: element and attribute names, attribute values,
//!   character content
//!
//! Input arrives in arbitrary chunks. A token cut by a chunk boundary stays
//! in the accumulation buffer and is completed by the next `feed` call, so
//! the token stream does not depend on where the boundaries fall.

use memchr::memchr;
use std::fmt;

use super::encoding::CharDecoder;
use super::unicode::is_xml_whitespace;
use crate::error::ParseError;

/// Current tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    /// Between markup, nothing buffered
    Start,
    /// Inside `<...>`
    InTag,
    /// Accumulating a bare name inside a tag
    InString,
    /// Accumulating a `"`-quoted attribute value
    InDoubleAttributeValue,
    /// Accumulating a `'`-quoted attribute value
    InSingleAttributeValue,
    /// Accumulating character content
    InText,
    /// Closed, further input is ignored
    Closed,
}

/// A lexical token
///
/// Text borrows the tokenizer's scratch buffer and is only valid for the
/// duration of the sink callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A single structural character
    Control(u8),
    /// A decoded name, attribute value or character run
    Text(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Control(c) => write!(f, "{}", *c as char),
            Token::Text(text) => f.write_str(text),
        }
    }
}

/// What the tokenizer should do after a token was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The stream is being reopened, drop any buffered bytes
    Restart,
    /// The consumer is done, stop tokenizing
    Close,
}

/// Receiver of the token stream
pub trait TokenSink {
    /// Called once per token, in input order
    fn token(&mut self, token: Token<'_>) -> Result<Flow, ParseError>;
}

/// Structural characters that end a bare name inside a tag
#[inline]
fn is_control_char(c: u8) -> bool {
    matches!(c, b'<' | b'>' | b'!' | b'/' | b'?' | b'=')
}

/// Streaming tokenizer
#[derive(Debug)]
pub struct Tokenizer {
    /// Bytes of the token being assembled
    buffer: Vec<u8>,
    /// Decoded text of the token being emitted
    text: String,
    state: TokenizerState,
}

impl Tokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Tokenizer {
            buffer: Vec::with_capacity(16),
            text: String::with_capacity(16),
            state: TokenizerState::Start,
        }
    }

    /// Get the current state
    pub fn state(&self) -> TokenizerState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == TokenizerState::Closed
    }

    /// Number of bytes held for a partial token
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Tokenize the available bytes, emitting tokens to `sink`.
    ///
    /// Never waits for more input: when the bytes run out mid-token the
    /// partial token is kept for the next call. A sink error closes the
    /// tokenizer and is returned.
    pub fn feed<S: TokenSink>(
        &mut self,
        bytes: &[u8],
        decoder: &mut CharDecoder,
        sink: &mut S,
    ) -> Result<(), ParseError> {
        let mut pos = 0;

        while pos < bytes.len() {
            match self.state {
                TokenizerState::Closed => break,
                TokenizerState::Start => {
                    let c = bytes[pos];
                    pos += 1;
                    if c == b'<' {
                        self.emit_control(c, sink)?;
                        self.transition(TokenizerState::InTag);
                    } else {
                        self.buffer.push(c);
                        self.transition(TokenizerState::InText);
                    }
                }
                TokenizerState::InText => {
                    pos = self.accumulate_until(bytes, pos, b'<');
                    if pos < bytes.len() {
                        pos += 1;
                        self.flush(decoder, sink)?;
                        self.emit_control(b'<', sink)?;
                        self.transition(TokenizerState::InTag);
                    }
                }
                TokenizerState::InTag => {
                    let c = bytes[pos];
                    pos += 1;
                    match c {
                        b'>' => {
                            self.emit_control(c, sink)?;
                            self.transition(TokenizerState::Start);
                        }
                        b'"' => {
                            self.emit_control(c, sink)?;
                            self.transition(TokenizerState::InDoubleAttributeValue);
                        }
                        b'\'' => {
                            self.emit_control(c, sink)?;
                            self.transition(TokenizerState::InSingleAttributeValue);
                        }
                        b'-' => self.emit_control(c, sink)?,
                        c if is_control_char(c) => self.emit_control(c, sink)?,
                        c if is_xml_whitespace(c) => {}
                        c => {
                            self.buffer.push(c);
                            self.transition(TokenizerState::InString);
                        }
                    }
                }
                TokenizerState::InString => {
                    let c = bytes[pos];
                    pos += 1;
                    if c == b'>' {
                        self.flush(decoder, sink)?;
                        self.emit_control(c, sink)?;
                        self.transition(TokenizerState::Start);
                    } else if is_control_char(c) {
                        self.flush(decoder, sink)?;
                        self.emit_control(c, sink)?;
                        self.transition(TokenizerState::InTag);
                    } else if is_xml_whitespace(c) {
                        self.flush(decoder, sink)?;
                        self.transition(TokenizerState::InTag);
                    } else {
                        self.buffer.push(c);
                    }
                }
                TokenizerState::InDoubleAttributeValue | TokenizerState::InSingleAttributeValue => {
                    let quote = if self.state == TokenizerState::InDoubleAttributeValue {
                        b'"'
                    } else {
                        b'\''
                    };
                    pos = self.accumulate_until(bytes, pos, quote);
                    if pos < bytes.len() {
                        pos += 1;
                        self.flush(decoder, sink)?;
                        self.emit_control(quote, sink)?;
                        self.transition(TokenizerState::InTag);
                    }
                }
            }
        }

        Ok(())
    }

    /// Discard any partial token and stop. Idempotent.
    pub fn close(&mut self) {
        self.state = TokenizerState::Closed;
        self.buffer.clear();
    }

    /// Drop the buffered partial token, keeping the current state
    pub fn restart(&mut self) {
        self.buffer.clear();
    }

    /// Return to the initial state, reopening a closed tokenizer
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = TokenizerState::Start;
    }

    /// Buffer bytes up to (not including) `delimiter`, returning its position
    /// or `bytes.len()` if it is not in this chunk
    #[inline]
    fn accumulate_until(&mut self, bytes: &[u8], pos: usize, delimiter: u8) -> usize {
        match memchr(delimiter, &bytes[pos..]) {
            Some(offset) => {
                self.buffer.extend_from_slice(&bytes[pos..pos + offset]);
                pos + offset
            }
            None => {
                self.buffer.extend_from_slice(&bytes[pos..]);
                bytes.len()
            }
        }
    }

    /// State changes never reopen a tokenizer closed by its sink
    #[inline]
    fn transition(&mut self, next: TokenizerState) {
        if self.state != TokenizerState::Closed {
            self.state = next;
        }
    }

    fn emit_control<S: TokenSink>(&mut self, c: u8, sink: &mut S) -> Result<(), ParseError> {
        if self.state == TokenizerState::Closed {
            return Ok(());
        }
        let flow = sink.token(Token::Control(c));
        self.apply(flow)
    }

    /// Decode the buffered bytes and emit them as one text token
    fn flush<S: TokenSink>(
        &mut self,
        decoder: &mut CharDecoder,
        sink: &mut S,
    ) -> Result<(), ParseError> {
        if self.state == TokenizerState::Closed {
            return Ok(());
        }
        self.text.clear();
        let decoded = decoder.decode_into(&self.buffer, &mut self.text);
        self.buffer.clear();
        if let Err(err) = decoded {
            self.close();
            return Err(err);
        }

        let flow = sink.token(Token::Text(&self.text));
        self.apply(flow)
    }

    fn apply(&mut self, flow: Result<Flow, ParseError>) -> Result<(), ParseError> {
        match flow {
            Ok(Flow::Continue) => Ok(()),
            Ok(Flow::Restart) => {
                self.restart();
                Ok(())
            }
            Ok(Flow::Close) => {
                self.close();
                Ok(())
            }
            Err(err) => {
                self.close();
                Err(err)
            }
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records tokens as strings; control characters are wrapped in brackets
    #[derive(Default)]
    struct Recorder {
        tokens: Vec<String>,
        close_after: Option<usize>,
        fail_on: Option<&'static str>,
    }

    impl TokenSink for Recorder {
        fn token(&mut self, token: Token<'_>) -> Result<Flow, ParseError> {
            let rendered = match token {
                Token::Control(c) => format!("[{}]", c as char),
                Token::Text(text) => text.to_string(),
            };
            if self.fail_on == Some(rendered.as_str()) {
                return Err(ParseError::NotWellFormed("test"));
            }
            self.tokens.push(rendered);
            if self.close_after == Some(self.tokens.len()) {
                return Ok(Flow::Close);
            }
            Ok(Flow::Continue)
        }
    }

    fn tokenize_bytes(chunks: &[&[u8]]) -> Vec<String> {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        for chunk in chunks {
            tokenizer.feed(chunk, &mut decoder, &mut recorder).unwrap();
        }
        recorder.tokens
    }

    fn tokenize_chunks(chunks: &[&str]) -> Vec<String> {
        let chunks: Vec<&[u8]> = chunks.iter().map(|chunk| chunk.as_bytes()).collect();
        tokenize_bytes(&chunks)
    }

    #[test]
    fn test_simple_element() {
        let tokens = tokenize_chunks(&["<root>text</root>"]);
        assert_eq!(
            tokens,
            vec!["[<]", "root", "[>]", "text", "[<]", "[/]", "root", "[>]"]
        );
    }

    #[test]
    fn test_attributes() {
        let tokens = tokenize_chunks(&["<a x='1' y=\"t w>o\"/>"]);
        assert_eq!(
            tokens,
            vec![
                "[<]", "a", "x", "[=]", "[']", "1", "[']", "y", "[=]", "[\"]", "t w>o", "[\"]",
                "[/]", "[>]"
            ]
        );
    }

    #[test]
    fn test_empty_attribute_value() {
        let tokens = tokenize_chunks(&["<a x=''>"]);
        assert_eq!(tokens, vec!["[<]", "a", "x", "[=]", "[']", "", "[']", "[>]"]);
    }

    #[test]
    fn test_comment_tokens() {
        let tokens = tokenize_chunks(&["<!-- hi -->"]);
        assert_eq!(
            tokens,
            vec!["[<]", "[!]", "[-]", "[-]", "hi", "[-]", "[-]", "[>]"]
        );
    }

    #[test]
    fn test_declaration_tokens() {
        let tokens = tokenize_chunks(&["<?xml version='1.0'?>"]);
        assert_eq!(
            tokens,
            vec!["[<]", "[?]", "xml", "version", "[=]", "[']", "1.0", "[']", "[?]", "[>]"]
        );
    }

    #[test]
    fn test_split_name_and_value() {
        let whole = tokenize_chunks(&["<root att='value'>"]);
        let split = tokenize_chunks(&["<ro", "ot at", "t='val", "ue'", ">"]);
        assert_eq!(whole, split);
    }

    #[test]
    fn test_split_multibyte_text() {
        // U+1251 is three bytes, split after the second
        let input = "<a>\u{1251}<".as_bytes();
        let tokens = tokenize_bytes(&[&input[..5], &input[5..]]);
        assert_eq!(tokens, vec!["[<]", "a", "[>]", "\u{1251}", "[<]"]);
    }

    #[test]
    fn test_partial_token_is_buffered() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        tokenizer
            .feed(b"<stream", &mut decoder, &mut recorder)
            .unwrap();
        assert_eq!(recorder.tokens, vec!["[<]"]);
        assert_eq!(tokenizer.state(), TokenizerState::InString);
        assert_eq!(tokenizer.pending(), 6);
    }

    #[test]
    fn test_sink_close_stops_tokenizing() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder {
            close_after: Some(3),
            ..Default::default()
        };
        tokenizer
            .feed(b"<a>text<b>", &mut decoder, &mut recorder)
            .unwrap();
        assert_eq!(recorder.tokens, vec!["[<]", "a", "[>]"]);
        assert!(tokenizer.is_closed());
        assert_eq!(tokenizer.pending(), 0);
    }

    #[test]
    fn test_sink_error_closes() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder {
            fail_on: Some("bad"),
            ..Default::default()
        };
        let result = tokenizer.feed(b"<bad attr='x'>", &mut decoder, &mut recorder);
        assert!(result.is_err());
        assert!(tokenizer.is_closed());
        assert_eq!(recorder.tokens, vec!["[<]"]);
    }

    #[test]
    fn test_decode_error_closes() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        let result = tokenizer.feed(b"<a>\xFF<", &mut decoder, &mut recorder);
        assert!(matches!(result, Err(ParseError::Decode(_))));
        assert!(tokenizer.is_closed());
    }

    #[test]
    fn test_truncated_character_ends_token() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        let result = tokenizer.feed(b"<a x='\xC3'>\xA9<", &mut decoder, &mut recorder);
        assert!(matches!(result, Err(ParseError::Decode(_))));
        assert_eq!(recorder.tokens, vec!["[<]", "a", "x", "[=]", "[']"]);
        assert!(tokenizer.is_closed());
    }

    #[test]
    fn test_form_feed_is_not_a_separator() {
        let tokens = tokenize_bytes(&[&b"<a\x0Cb>"[..]]);
        assert_eq!(tokens, vec!["[<]", "a\x0Cb", "[>]"]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        tokenizer.feed(b"<abc", &mut decoder, &mut recorder).unwrap();
        tokenizer.close();
        tokenizer.close();
        assert!(tokenizer.is_closed());
        tokenizer.feed(b"def>", &mut decoder, &mut recorder).unwrap();
        assert_eq!(recorder.tokens, vec!["[<]"]);
    }

    #[test]
    fn test_restart_drops_partial_token() {
        let mut tokenizer = Tokenizer::new();
        let mut decoder = CharDecoder::utf8();
        let mut recorder = Recorder::default();
        tokenizer.feed(b"<abc", &mut decoder, &mut recorder).unwrap();
        tokenizer.restart();
        assert_eq!(tokenizer.pending(), 0);
        assert_eq!(tokenizer.state(), TokenizerState::InString);
    }
}
