//! Errors for single-field and whole-query operations.

use alloc::string::{FromUtf8Error, String};
use alloc::vec::Vec;
use thiserror::Error;

/// Errors produced while escaping or unescaping a query field.
///
/// `E` is the error type of the [`Transform`](crate::Transform) in use. Transform
/// failures are carried as-is in [`Error::Transform`] and display exactly like
/// the underlying error.
///
/// # Examples
///
/// ```
/// use query_transcode::{query_unescape, Error, Identity};
///
/// match query_unescape("100%zz", &mut Identity) {
///     Err(Error::MalformedEscape { fragment }) => assert_eq!(fragment, b"%zz"),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// A `%` not followed by two hex digits.
    ///
    /// `fragment` holds the `%` and at most two following bytes.
    #[error("invalid URL escape {:?}", String::from_utf8_lossy(.fragment))]
    MalformedEscape {
        /// The offending bytes, starting at the `%`
        fragment: Vec<u8>,
    },

    /// The transform produced bytes that are not valid UTF-8.
    #[error("decoded query field is not valid UTF-8")]
    InvalidUtf8(#[source] FromUtf8Error),

    /// The transform rejected the field.
    #[error(transparent)]
    Transform(E),
}

impl<E> Error<E> {
    /// Returns the transform error, if this is one.
    pub fn as_transform(&self) -> Option<&E> {
        match self {
            Error::Transform(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn malformed(rest: &[u8]) -> Self {
        Error::MalformedEscape {
            fragment: rest[..rest.len().min(3)].to_vec(),
        }
    }
}

/// The result of a best-effort operation over many fields.
///
/// [`parse`](crate::parse) and [`encode`](crate::encode) keep going after a field
/// fails: the failing field is left out of `value` and only the first error is kept.
///
/// # Examples
///
/// ```
/// use query_transcode::{parse, Identity};
///
/// let outcome = parse("a=1&b=%zz&c=3", &mut Identity);
/// assert!(outcome.error().is_some());
/// assert_eq!(outcome.value().get("a"), Some("1"));
/// assert_eq!(outcome.value().get("c"), Some("3"));
/// assert!(!outcome.value().contains_key("b"));
///
/// // Or treat any failure as fatal:
/// assert!(parse("a=%zz", &mut Identity).into_result().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T, E> {
    value: T,
    error: Option<E>,
}

impl<T, E> Outcome<T, E> {
    pub(crate) fn new(value: T, error: Option<E>) -> Self {
        Self { value, error }
    }

    /// The produced value, possibly missing the fields that failed.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The first error encountered, if any.
    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Returns `true` if every field succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Splits into the (partial) value and the first error.
    pub fn into_parts(self) -> (T, Option<E>) {
        (self.value, self.error)
    }

    /// Discards the partial value if any field failed.
    pub fn into_result(self) -> Result<T, E> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::convert::Infallible;

    #[test]
    fn malformed_truncates_to_three_bytes() {
        let e = Error::<Infallible>::malformed(b"%zzzz");
        assert_eq!(e, Error::MalformedEscape { fragment: b"%zz".to_vec() });
        let e = Error::<Infallible>::malformed(b"%");
        assert_eq!(e, Error::MalformedEscape { fragment: b"%".to_vec() });
    }

    #[test]
    fn malformed_display_quotes_fragment() {
        let e = Error::<Infallible>::malformed(b"%9");
        assert_eq!(e.to_string(), "invalid URL escape \"%9\"");
    }

    #[test]
    fn transform_error_is_transparent() {
        #[derive(Debug, Error)]
        #[error("no such character")]
        struct Unmappable;

        let e = Error::Transform(Unmappable);
        assert_eq!(e.to_string(), "no such character");
        assert!(e.as_transform().is_some());
    }

    #[test]
    fn outcome_into_result() {
        let ok: Outcome<u8, &str> = Outcome::new(1, None);
        assert!(ok.is_ok());
        assert_eq!(ok.into_result(), Ok(1));

        let partial: Outcome<u8, &str> = Outcome::new(1, Some("boom"));
        assert_eq!(partial.clone().into_parts(), (1, Some("boom")));
        assert_eq!(partial.into_result(), Err("boom"));
    }
}
