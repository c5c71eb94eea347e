//! Token Character Decoding
//!
//! The tokenizer buffers the raw bytes of a token until its ASCII delimiter
//! arrives, so a multi-byte character cut by a chunk boundary is already
//! whole when the token is decoded. Every token is therefore decoded as
//! complete input: bytes that end mid-character are malformed and are never
//! carried into the next token.
//!
//! Only ASCII-compatible encodings are accepted: the tokenizer classifies raw
//! bytes against ASCII delimiters before decoding. A byte order mark is only
//! recognized at the start of the first token.

use encoding_rs::{DecoderResult, Encoding, UTF_8};

use crate::error::{ConfigError, ParseError};

/// Per-stream decoder passed alongside every input chunk
pub struct CharDecoder {
    encoding: &'static Encoding,
    inner: encoding_rs::Decoder,
}

impl CharDecoder {
    /// UTF-8 decoder, the encoding of XMPP streams
    pub fn utf8() -> Self {
        Self::new(UTF_8)
    }

    /// Decoder for a WHATWG encoding label such as `"utf-8"` or `"latin1"`
    pub fn for_label(label: &str) -> Result<Self, ConfigError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))?;
        if !encoding.is_ascii_compatible() {
            return Err(ConfigError::UnsupportedEncoding(encoding.name().to_string()));
        }
        Ok(Self::new(encoding))
    }

    fn new(encoding: &'static Encoding) -> Self {
        CharDecoder {
            encoding,
            inner: encoding.new_decoder_with_bom_removal(),
        }
    }

    /// The encoding this decoder reads
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Decode one complete token, appending the text to `out`.
    ///
    /// A trailing incomplete sequence is a decode error.
    pub fn decode_into(&mut self, bytes: &[u8], out: &mut String) -> Result<(), ParseError> {
        let needed = self
            .inner
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len().saturating_mul(3) + 4);
        out.reserve(needed);

        let (result, _read) = self
            .inner
            .decode_to_string_without_replacement(bytes, out, true);
        // a finished decoder can not be fed again
        self.inner = self.encoding.new_decoder_without_bom_handling();
        match result {
            DecoderResult::InputEmpty => Ok(()),
            DecoderResult::Malformed(_, _) => Err(ParseError::Decode(format!(
                "invalid {} byte sequence",
                self.encoding.name()
            ))),
            DecoderResult::OutputFull => Err(ParseError::Decode(
                "decoder output buffer exhausted".to_string(),
            )),
        }
    }

    /// Convenience wrapper around [`decode_into`](Self::decode_into)
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String, ParseError> {
        let mut out = String::new();
        self.decode_into(bytes, &mut out)?;
        Ok(out)
    }
}

impl Default for CharDecoder {
    fn default() -> Self {
        Self::utf8()
    }
}

impl std::fmt::Debug for CharDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharDecoder")
            .field("encoding", &self.encoding.name())
            .finish()
    }
}
