//! Character-encoding transforms backed by [`encoding_rs`].
//!
//! [`Decoder`] turns bytes in a legacy encoding into UTF-8 and belongs on the
//! parse side; [`Encoder`] turns UTF-8 into the legacy encoding and belongs on
//! the encode side.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use encoding_rs::{EncoderResult, Encoding, ISO_2022_JP, UTF_8};
use thiserror::Error;

use crate::transform::Transform;

/// Why a field could not be converted between UTF-8 and a legacy encoding.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetError {
    /// The input is not a valid byte sequence in `encoding`.
    #[error("malformed {encoding} byte sequence")]
    Malformed {
        /// Name of the source encoding
        encoding: &'static str,
    },

    /// `character` has no representation in `encoding`.
    #[error("character {character:?} cannot be encoded in {encoding}")]
    Unmappable {
        /// Name of the target encoding
        encoding: &'static str,
        /// The first character that could not be encoded
        character: char,
    },
}

/// Decodes bytes in a legacy encoding to UTF-8.
///
/// By default any malformed input fails with [`CharsetError::Malformed`].
/// A [`lossy`](Decoder::lossy) decoder substitutes U+FFFD instead and counts the
/// fields where that happened.
///
/// # Examples
///
/// ```
/// use query_transcode::{parse, charset::Decoder};
///
/// let mut decoder = Decoder::new(encoding_rs::SHIFT_JIS);
/// let values = parse("sjis=%3C%93%FA%96%7B%8C%EA+SJIS%3E", &mut decoder)
///     .into_result()
///     .unwrap();
/// assert_eq!(values.get("sjis"), Some("<日本語 SJIS>"));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    encoding: &'static Encoding,
    lossy: bool,
    replaced_fields: usize,
}

impl Decoder {
    /// A strict decoder for `encoding`.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            lossy: false,
            replaced_fields: 0,
        }
    }

    /// A decoder for `encoding` that replaces malformed sequences with U+FFFD.
    ///
    /// # Examples
    ///
    /// ```
    /// use query_transcode::{query_unescape, charset::Decoder};
    ///
    /// let mut decoder = Decoder::lossy(encoding_rs::SHIFT_JIS);
    /// assert_eq!(query_unescape("%93%FA%FF", &mut decoder).unwrap(), "日\u{FFFD}");
    /// assert_eq!(query_unescape("ok", &mut decoder).unwrap(), "ok");
    /// assert_eq!(decoder.replaced_fields(), 1);
    /// ```
    pub fn lossy(encoding: &'static Encoding) -> Self {
        Self {
            lossy: true,
            ..Self::new(encoding)
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Number of fields that needed at least one replacement character.
    ///
    /// Always zero for a strict decoder.
    pub fn replaced_fields(&self) -> usize {
        self.replaced_fields
    }
}

impl Transform for Decoder {
    type Error = CharsetError;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
        let decoded = if self.lossy {
            let (decoded, had_errors) = self.encoding.decode_without_bom_handling(input);
            if had_errors {
                log::trace!("replaced malformed {} input", self.encoding.name());
                self.replaced_fields += 1;
            }
            decoded
        } else {
            self.encoding
                .decode_without_bom_handling_and_without_replacement(input)
                .ok_or(CharsetError::Malformed {
                    encoding: self.encoding.name(),
                })?
        };

        Ok(match decoded {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        })
    }
}

/// Encodes UTF-8 into a legacy encoding.
///
/// Characters the target encoding cannot represent fail with
/// [`CharsetError::Unmappable`]; nothing is substituted. Encodings whose output
/// encoding is UTF-8 (UTF-8 itself, UTF-16LE/BE and `replacement`) pass
/// input through unchanged, as do ASCII-only fields.
///
/// # Examples
///
/// ```
/// use query_transcode::{encode, Values, charset::Encoder};
///
/// let values = Values::new().with("sjis", "<日本語 SJIS>");
/// let mut encoder = Encoder::new(encoding_rs::SHIFT_JIS);
/// assert_eq!(
///     encode(&values, &mut encoder).into_result().unwrap(),
///     "sjis=%3C%93%FA%96%7B%8C%EA+SJIS%3E"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    encoding: &'static Encoding,
}

impl Encoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding: encoding.output_encoding(),
        }
    }

    /// The encoding bytes are actually produced in.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Transform for Encoder {
    type Error = CharsetError;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
        if self.encoding == UTF_8 {
            return Ok(Cow::Borrowed(input));
        }

        let valid_up_to = if self.encoding == ISO_2022_JP {
            Encoding::iso_2022_jp_ascii_valid_up_to(input)
        } else {
            Encoding::ascii_valid_up_to(input)
        };
        if valid_up_to == input.len() {
            return Ok(Cow::Borrowed(input));
        }

        // Transform input is always the bytes of a `&str` on the encode side.
        let Ok(mut rest) = core::str::from_utf8(input) else {
            return Err(CharsetError::Malformed { encoding: UTF_8.name() });
        };

        let mut encoder = self.encoding.new_encoder();
        let mut output = Vec::with_capacity(
            encoder
                .max_buffer_length_from_utf8_without_replacement(rest.len())
                .unwrap_or(rest.len()),
        );
        loop {
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut output, true);
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => {
                    rest = &rest[read..];
                    output.reserve(
                        encoder
                            .max_buffer_length_from_utf8_without_replacement(rest.len())
                            .unwrap_or(rest.len()),
                    );
                }
                EncoderResult::Unmappable(character) => {
                    return Err(CharsetError::Unmappable {
                        encoding: self.encoding.name(),
                        character,
                    });
                }
            }
        }

        Ok(Cow::Owned(output))
    }
}
