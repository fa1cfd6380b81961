//! The byte-level transform applied to every query field.
//!
//! Decoding runs the transform *after* percent-decoding; encoding runs it
//! *before* percent-encoding. Anything that converts bytes and may fail can be
//! plugged in: [`Identity`], a closure via [`from_fn`], or one of the
//! `encoding_rs`-backed transforms in [`crate::charset`].

use alloc::borrow::Cow;
use core::convert::Infallible;

/// A possibly-failing byte sequence conversion.
///
/// Implementations may keep state while converting one field, but must not
/// carry it from one field to the next: [`reset`](Transform::reset) is called
/// before each field and [`transform`](Transform::transform) exactly once per field.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use query_transcode::{query_escape, Transform};
///
/// /// Upper-cases ASCII letters.
/// struct Shout;
///
/// impl Transform for Shout {
///     type Error = core::convert::Infallible;
///
///     fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
///         Ok(Cow::Owned(input.to_ascii_uppercase()))
///     }
/// }
///
/// assert_eq!(query_escape("hello world", &mut Shout).unwrap(), "HELLO+WORLD");
/// ```
pub trait Transform {
    /// Error reported when a field cannot be converted.
    type Error;

    /// Clears any per-field state.
    fn reset(&mut self) {}

    /// Converts one complete field.
    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error>;
}

impl<T: Transform + ?Sized> Transform for &mut T {
    type Error = T::Error;

    fn reset(&mut self) {
        (**self).reset()
    }

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
        (**self).transform(input)
    }
}

/// Runs `transform` over a whole field, resetting it first.
pub(crate) fn apply<'a, T: Transform + ?Sized>(
    t: &mut T,
    input: &'a [u8],
) -> Result<Cow<'a, [u8]>, T::Error> {
    t.reset();
    t.transform(input)
}

/// Passes bytes through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Transform for Identity {
    type Error = Infallible;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
        Ok(Cow::Borrowed(input))
    }
}

/// A [`Transform`] built from a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnTransform<F> {
    f: F,
}

impl<F> core::fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnTransform").finish_non_exhaustive()
    }
}

impl<F, E> Transform for FnTransform<F>
where
    F: FnMut(&[u8]) -> Result<alloc::vec::Vec<u8>, E>,
{
    type Error = E;

    fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
        (self.f)(input).map(Cow::Owned)
    }
}

/// Wraps a closure returning owned bytes as a [`Transform`].
///
/// # Arguments
///
/// * `f` - Called once per field with the field's bytes
///
/// # Examples
///
/// ```
/// use query_transcode::{from_fn, query_unescape};
///
/// // Treat every byte as Latin-1.
/// let mut latin1 = from_fn(|bytes: &[u8]| {
///     Ok::<_, core::convert::Infallible>(
///         bytes.iter().map(|&b| b as char).collect::<String>().into_bytes(),
///     )
/// });
///
/// assert_eq!(query_unescape("caf%E9", &mut latin1).unwrap(), "café");
/// ```
pub fn from_fn<F, E>(f: F) -> FnTransform<F>
where
    F: FnMut(&[u8]) -> Result<alloc::vec::Vec<u8>, E>,
{
    FnTransform { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct Counting {
        resets: usize,
        calls: usize,
    }

    impl Transform for Counting {
        type Error = Infallible;

        fn reset(&mut self) {
            self.resets += 1;
        }

        fn transform<'a>(&mut self, input: &'a [u8]) -> Result<Cow<'a, [u8]>, Self::Error> {
            self.calls += 1;
            Ok(Cow::Borrowed(input))
        }
    }

    #[test]
    fn identity_borrows() {
        let out = apply(&mut Identity, b"abc").unwrap();
        assert!(matches!(out, Cow::Borrowed(b"abc")));
    }

    #[test]
    fn apply_resets_before_each_call() {
        let mut t = Counting { resets: 0, calls: 0 };
        apply(&mut t, b"a").unwrap();
        apply(&mut &mut t, b"b").unwrap();
        assert_eq!(t.resets, 2);
        assert_eq!(t.calls, 2);
    }

    #[test]
    fn closure_errors_pass_through() {
        let mut t = from_fn(|b: &[u8]| if b.is_empty() { Err("empty") } else { Ok(b.to_vec()) });
        assert_eq!(apply(&mut t, b"").unwrap_err(), "empty");
        assert_eq!(apply(&mut t, b"x").unwrap().into_owned(), Vec::from(&b"x"[..]));
    }
}
