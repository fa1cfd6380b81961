//! # Query Transcode
//!
//! Percent-decoding and percent-encoding of URL query strings whose keys and
//! values are not UTF-8, such as forms submitted by legacy Shift_JIS, EUC-JP or
//! EUC-KR pages. Supports both `std` and `no_std` (with `alloc`) environments.
//!
//! Every key and value passes through a [`Transform`]: after percent-decoding
//! when parsing, before percent-encoding when serializing. The transform is
//! usually a character-encoding conversion, but anything implementing the trait
//! works, including [`Identity`] for plain UTF-8 queries.
//!
//! ## Features
//!
//! - **Byte-accurate escaping**: `%XX` and `+` decoding with malformed-escape detection
//! - **Form-style encoding**: spaces become `+`, only `A-Z a-z 0-9 - _ . ~` stay literal
//! - **Pluggable transforms**: any possibly-failing byte conversion
//! - **Best-effort parsing**: one bad field does not hide the rest of the query
//! - **Legacy encodings**: `encoding_rs` transforms behind the `encoding` feature
//!
//! ## Quick Start
//!
//! ### With a character encoding (`encoding` feature)
//!
//! ```rust
//! # #[cfg(feature = "encoding")] {
//! use query_transcode::QueryCodec;
//!
//! let sjis = QueryCodec::new(encoding_rs::SHIFT_JIS);
//!
//! let values = sjis
//!     .parse("sjis=%3C%93%FA%96%7B%8C%EA+SJIS%3E")
//!     .into_result()
//!     .expect("valid Shift_JIS query");
//! assert_eq!(values.get("sjis"), Some("<日本語 SJIS>"));
//!
//! let query = sjis.encode(&values).into_result().unwrap();
//! assert_eq!(query, "sjis=%3C%93%FA%96%7B%8C%EA+SJIS%3E");
//! # }
//! ```
//!
//! ### With any transform
//!
//! ```rust
//! use query_transcode::{parse, encode, Identity};
//!
//! let outcome = parse("a=1&a=2&b=%zz&c=x+y", &mut Identity);
//!
//! // The malformed pair is dropped, everything else is kept.
//! assert_eq!(outcome.error().unwrap().to_string(), "invalid URL escape \"%zz\"");
//! let values = outcome.value();
//! assert_eq!(values.get_all("a"), ["1", "2"]);
//! assert_eq!(values.get("c"), Some("x y"));
//!
//! let query = encode(values, &mut Identity).into_result().unwrap();
//! assert_eq!(query, "a=1&a=2&c=x+y");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod hex;
pub mod query;
pub mod transform;
pub mod url_decode;
pub mod url_encode;
pub mod values;

#[cfg(feature = "encoding")]
pub mod charset;
#[cfg(feature = "encoding")]
pub mod codec;

use core::hash::BuildHasherDefault;
use hashbrown::HashMap;
use rustc_hash::FxHasher;

/// A fast HashMap implementation using FxHasher.
///
/// Backs [`Values`]; query keys are short strings, where FxHasher does well.
///
/// # Examples
///
/// ```
/// use query_transcode::{FxHashMap, Values};
///
/// let mut map: FxHashMap<String, Vec<String>> = FxHashMap::default();
/// map.insert("key".to_string(), vec!["value".to_string()]);
/// let values = Values::from(map);
/// assert_eq!(values.get("key"), Some("value"));
/// ```
pub type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

pub use error::{Error, Outcome};
pub use query::{encode, parse};
pub use transform::{from_fn, FnTransform, Identity, Transform};
pub use url_decode::query_unescape;
pub use url_encode::{query_escape, should_escape};
pub use values::Values;

#[cfg(feature = "encoding")]
pub use codec::{QueryCodec, QueryCodecBuilder};
#[cfg(feature = "encoding")]
pub use encoding_rs;
