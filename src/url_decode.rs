//! Query component unescaping.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::hex::{is_hex, unhex};
use crate::transform::{self, Transform};

/// Decode a single query component, then run it through `t`.
///
/// `%XX` sequences become the byte they name and `+` becomes a space. The
/// resulting bytes are handed to the transform in one piece, and the transform's
/// output is the decoded field. A string with no `%` and no `+` goes to the
/// transform as-is, without an intermediate copy.
///
/// # Arguments
///
/// * `s` - The escaped component (a key or a value, not a whole query)
/// * `t` - The transform that turns the raw bytes into UTF-8
///
/// # Returns
///
/// * `Ok(String)` - The decoded, transformed field
/// * `Err(Error::MalformedEscape)` - A `%` was not followed by two hex digits
/// * `Err(Error::Transform)` - The transform rejected the bytes
/// * `Err(Error::InvalidUtf8)` - The transform output is not UTF-8
///
/// # Examples
///
/// ```
/// use query_transcode::{query_unescape, Identity};
///
/// assert_eq!(query_unescape("%3Ckey%3A+0x90%3E", &mut Identity).unwrap(), "<key: 0x90>");
/// assert_eq!(query_unescape("a%20b+c", &mut Identity).unwrap(), "a b c");
/// assert!(query_unescape("%9", &mut Identity).is_err());
/// ```
pub fn query_unescape<T>(s: &str, t: &mut T) -> Result<String, Error<T::Error>>
where
    T: Transform + ?Sized,
{
    let bytes = s.as_bytes();

    // Count escapes and validate them before touching anything.
    let mut n = 0;
    let mut has_plus = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                n += 1;
                if i + 2 >= bytes.len() || !is_hex(bytes[i + 1]) || !is_hex(bytes[i + 2]) {
                    return Err(Error::malformed(&bytes[i..]));
                }
                i += 3;
            }
            b'+' => {
                has_plus = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    if n == 0 && !has_plus {
        return finish(transform::apply(t, bytes));
    }

    let mut buf = Vec::with_capacity(bytes.len() - 2 * n);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                buf.push(unhex(bytes[i + 1]) << 4 | unhex(bytes[i + 2]));
                i += 3;
            }
            b'+' => {
                buf.push(b' ');
                i += 1;
            }
            c => {
                buf.push(c);
                i += 1;
            }
        }
    }
    debug_assert_eq!(buf.len(), bytes.len() - 2 * n);

    finish(transform::apply(t, &buf))
}

fn finish<E>(out: Result<alloc::borrow::Cow<'_, [u8]>, E>) -> Result<String, Error<E>> {
    let out = out.map_err(Error::Transform)?;
    String::from_utf8(out.into_owned()).map_err(Error::InvalidUtf8)
}
