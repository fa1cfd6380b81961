//! Query component escaping.
//!
//! The field is first run through the [`Transform`], then every byte of the
//! result is percent-encoded except unreserved characters
//! (ALPHA / DIGIT / "-" / "." / "_" / "~"). Spaces are encoded as '+' for
//! form-encoded data compatibility, so a literal '+' always becomes `%2B`.

use alloc::string::String;

use crate::error::Error;
use crate::hex::hex_digit;
use crate::transform::{self, Transform};

/// Escapes up to this many output bytes without a heap scratch buffer.
const STACK_BUF_LEN: usize = 64;

/// Returns `true` if `c` must be percent-encoded in a query component.
///
/// Space also returns `true`; [`query_escape`] writes it as `+`.
///
/// # Examples
///
/// ```
/// use query_transcode::should_escape;
///
/// assert!(!should_escape(b'a'));
/// assert!(!should_escape(b'~'));
/// assert!(should_escape(b'+'));
/// assert!(should_escape(b' '));
/// assert!(should_escape(0x93));
/// ```
pub fn should_escape(c: u8) -> bool {
    !matches!(c, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

/// Run `s` through `t`, then URL encode the result for use in a query.
///
/// # Arguments
///
/// * `s` - The string to be URL encoded
/// * `t` - The transform producing the bytes to encode, typically a charset encoder
///
/// # Returns
///
/// * `Ok(String)` - The encoded component, always plain ASCII
/// * `Err(Error::Transform)` - The transform rejected `s`
///
/// # Examples
///
/// ```
/// use query_transcode::{query_escape, Identity};
///
/// // Basic encoding
/// assert_eq!(query_escape("hello world", &mut Identity).unwrap(), "hello+world");
///
/// // Special characters
/// assert_eq!(query_escape("hello@world.com", &mut Identity).unwrap(), "hello%40world.com");
///
/// // Unreserved characters remain unchanged
/// assert_eq!(query_escape("hello-world_123.txt~", &mut Identity).unwrap(), "hello-world_123.txt~");
///
/// // Non-ASCII bytes are escaped one by one
/// assert_eq!(query_escape("café", &mut Identity).unwrap(), "caf%C3%A9");
/// ```
pub fn query_escape<T>(s: &str, t: &mut T) -> Result<String, Error<T::Error>>
where
    T: Transform + ?Sized,
{
    let bytes = transform::apply(t, s.as_bytes()).map_err(Error::Transform)?;
    let bytes = &*bytes;

    let mut space_count = 0;
    let mut hex_count = 0;
    for &c in bytes {
        if should_escape(c) {
            if c == b' ' {
                space_count += 1;
            } else {
                hex_count += 1;
            }
        }
    }

    if space_count == 0 && hex_count == 0 {
        return Ok(ascii_string(bytes));
    }

    let required = bytes.len() + 2 * hex_count;
    let mut stack = [0u8; STACK_BUF_LEN];
    let mut heap;
    let token: &mut [u8] = if required <= STACK_BUF_LEN {
        &mut stack[..required]
    } else {
        heap = alloc::vec![0u8; required];
        &mut heap
    };

    if hex_count == 0 {
        token.copy_from_slice(bytes);
        for c in token.iter_mut() {
            if *c == b' ' {
                *c = b'+';
            }
        }
        return Ok(ascii_string(token));
    }

    let mut j = 0;
    for &c in bytes {
        if c == b' ' {
            token[j] = b'+';
            j += 1;
        } else if should_escape(c) {
            token[j] = b'%';
            token[j + 1] = hex_digit(c >> 4);
            token[j + 2] = hex_digit(c & 0x0F);
            j += 3;
        } else {
            token[j] = c;
            j += 1;
        }
    }
    debug_assert_eq!(j, required);

    Ok(ascii_string(token))
}

// Escaped output only ever holds ASCII, so each byte is one char.
fn ascii_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{from_fn, Identity};
    use alloc::vec::Vec;
    use core::convert::Infallible;

    fn escape(s: &str) -> String {
        query_escape(s, &mut Identity).unwrap()
    }

    #[test]
    fn unreserved_characters_are_untouched() {
        let s = "ABCxyz0189-._~";
        assert_eq!(escape(s), s);
        for c in 0..=u8::MAX {
            let unreserved = c.is_ascii_alphanumeric() || b"-._~".contains(&c);
            assert_eq!(should_escape(c), !unreserved, "byte {c:#04x}");
        }
    }

    #[test]
    fn spaces_only_take_the_copy_branch() {
        assert_eq!(escape("a b  c"), "a+b++c");
        assert_eq!(escape(" "), "+");
    }

    #[test]
    fn plus_is_escaped() {
        assert_eq!(escape("1+1"), "1%2B1");
    }

    #[test]
    fn mixed_escapes() {
        assert_eq!(escape("<key: 0x90>"), "%3Ckey%3A+0x90%3E");
        assert_eq!(escape("a&b=c;d"), "a%26b%3Dc%3Bd");
    }

    #[test]
    fn uppercase_hex() {
        let mut raw = from_fn(|_: &[u8]| Ok::<_, Infallible>(alloc::vec![0x00, 0xab, 0xff]));
        assert_eq!(query_escape("ignored", &mut raw).unwrap(), "%00%AB%FF");
    }

    #[test]
    fn output_larger_than_stack_buffer() {
        // 30 escaped bytes need 90 output bytes.
        let input: String = core::iter::repeat('/').take(30).collect();
        let expected: String = core::iter::repeat("%2F").take(30).collect();
        assert_eq!(escape(&input), expected);

        let input: String = core::iter::repeat(' ').take(100).collect();
        let expected: String = core::iter::repeat('+').take(100).collect();
        assert_eq!(escape(&input), expected);
    }

    #[test]
    fn exactly_stack_sized_output() {
        // 61 plain bytes plus one escape is 64 output bytes.
        let mut input: String = core::iter::repeat('a').take(61).collect();
        input.push('!');
        let out = escape(&input);
        assert_eq!(out.len(), STACK_BUF_LEN);
        assert!(out.ends_with("a%21"));
    }

    #[test]
    fn transform_runs_before_escaping() {
        let mut seen = Vec::new();
        let mut t = from_fn(|b: &[u8]| {
            seen.extend_from_slice(b);
            Ok::<_, Infallible>(b.to_vec())
        });
        query_escape("a b", &mut t).unwrap();
        assert_eq!(seen, b"a b");
    }

    #[test]
    fn transform_failure_aborts() {
        let mut t = from_fn(|_: &[u8]| Err::<Vec<u8>, _>("unmappable"));
        assert_eq!(query_escape("x", &mut t), Err(Error::Transform("unmappable")));
    }
}
