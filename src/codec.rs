//! A reusable query codec for one character encoding.

use alloc::string::String;

use encoding_rs::Encoding;

use crate::charset::{CharsetError, Decoder, Encoder};
use crate::error::{Error, Outcome};
use crate::values::Values;
use crate::{query, url_decode, url_encode};

/// Parses and encodes queries in a fixed character encoding.
///
/// Every call builds its own [`Decoder`] or [`Encoder`], so one codec can be
/// shared freely between threads. Encodings that only decode (UTF-16LE/BE and
/// `replacement`) use their output encoding, UTF-8, in both directions so a
/// codec always reads back what it writes.
///
/// # Examples
///
/// ```
/// use query_transcode::QueryCodec;
///
/// let sjis = QueryCodec::new(encoding_rs::SHIFT_JIS);
///
/// let values = sjis.parse("q=%93%FA%96%7B").into_result().unwrap();
/// assert_eq!(values.get("q"), Some("日本"));
/// assert_eq!(sjis.encode(&values).into_result().unwrap(), "q=%93%FA%96%7B");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryCodec {
    encoding: &'static Encoding,
    lossy: bool,
}

impl QueryCodec {
    /// A strict codec for `encoding`.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self::builder(encoding).build()
    }

    /// Start configuring a codec for `encoding`.
    ///
    /// The codec works in `encoding.output_encoding()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use query_transcode::QueryCodec;
    ///
    /// let codec = QueryCodec::builder(encoding_rs::EUC_KR).lossy(true).build();
    /// let values = codec.parse("name=%C7%D1%FF").into_result().unwrap();
    /// assert_eq!(values.get("name"), Some("한\u{FFFD}"));
    /// ```
    pub fn builder(encoding: &'static Encoding) -> QueryCodecBuilder {
        QueryCodecBuilder {
            codec: QueryCodec {
                encoding: encoding.output_encoding(),
                lossy: false,
            },
        }
    }

    /// Look up a codec by WHATWG encoding label, such as `"sjis"` or `"euc-kr"`.
    ///
    /// # Returns
    ///
    /// `None` if the label is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use query_transcode::QueryCodec;
    ///
    /// let codec = QueryCodec::for_label("sjis").unwrap();
    /// assert_eq!(codec.encoding(), encoding_rs::SHIFT_JIS);
    /// assert!(QueryCodec::for_label("klingon").is_none());
    /// ```
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Self::new)
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    /// A fresh decoder with this codec's settings.
    ///
    /// [`parse`](QueryCodec::parse) and [`unescape`](QueryCodec::unescape) discard
    /// theirs; use one of these with [`crate::parse`] to read
    /// [`Decoder::replaced_fields`] afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use query_transcode::{parse, QueryCodec};
    ///
    /// let codec = QueryCodec::builder(encoding_rs::SHIFT_JIS).lossy(true).build();
    /// let mut decoder = codec.decoder();
    /// parse("a=%93&b=%93%FA&c=%FF", &mut decoder).into_result().unwrap();
    /// assert_eq!(decoder.replaced_fields(), 2);
    /// ```
    pub fn decoder(&self) -> Decoder {
        if self.lossy {
            Decoder::lossy(self.encoding)
        } else {
            Decoder::new(self.encoding)
        }
    }

    /// A fresh encoder for this codec's encoding.
    pub fn encoder(&self) -> Encoder {
        Encoder::new(self.encoding)
    }

    /// Parse a whole query. See [`crate::parse`].
    pub fn parse(&self, query: &str) -> Outcome<Values, Error<CharsetError>> {
        query::parse(query, &mut self.decoder())
    }

    /// Encode a whole query. See [`crate::encode`].
    pub fn encode(&self, values: &Values) -> Outcome<String, Error<CharsetError>> {
        query::encode(values, &mut self.encoder())
    }

    /// Decode one component. See [`crate::query_unescape`].
    pub fn unescape(&self, s: &str) -> Result<String, Error<CharsetError>> {
        url_decode::query_unescape(s, &mut self.decoder())
    }

    /// Encode one component. See [`crate::query_escape`].
    pub fn escape(&self, s: &str) -> Result<String, Error<CharsetError>> {
        url_encode::query_escape(s, &mut self.encoder())
    }
}

/// Builder for [`QueryCodec`].
#[derive(Debug, Clone)]
pub struct QueryCodecBuilder {
    codec: QueryCodec,
}

impl QueryCodecBuilder {
    /// Replace malformed input with U+FFFD when decoding instead of failing.
    pub fn lossy(mut self, lossy: bool) -> Self {
        self.codec.lossy = lossy;
        self
    }

    pub fn build(self) -> QueryCodec {
        self.codec
    }
}
