//! Whole-query parsing and serialization.

use alloc::string::String;

use crate::error::{Error, Outcome};
use crate::transform::Transform;
use crate::url_decode::query_unescape;
use crate::url_encode::query_escape;
use crate::values::Values;

/// Parse a query string into a fresh [`Values`] map.
///
/// Pairs are separated by `&` or `;`, and a key is separated from its value by
/// the first `=`. Empty pairs are skipped; a pair without `=` has an empty value.
/// Keys and values are decoded independently with [`query_unescape`].
///
/// A pair whose key or value fails to decode is left out and parsing
/// continues with the next pair. The first such error is returned alongside
/// the map.
///
/// # Arguments
///
/// * `query` - The query string, without the leading `?`
/// * `t` - The transform applied to every decoded key and value
///
/// # Examples
///
/// ```
/// use query_transcode::{parse, Identity};
///
/// let values = parse("a=1&a=2;b&c=x+y", &mut Identity).into_result().unwrap();
/// assert_eq!(values.get_all("a"), ["1", "2"]);
/// assert_eq!(values.get("b"), Some(""));
/// assert_eq!(values.get("c"), Some("x y"));
/// ```
pub fn parse<T>(query: &str, t: &mut T) -> Outcome<Values, Error<T::Error>>
where
    T: Transform + ?Sized,
{
    let mut values = Values::new();
    let mut first_err = None;

    for pair in query.split(['&', ';']) {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));

        let key = match query_unescape(key, t) {
            Ok(key) => key,
            Err(e) => {
                log::debug!("dropping query pair {:?}: key does not decode", pair);
                if first_err.is_none() {
                    first_err = Some(e);
                }
                continue;
            }
        };
        let value = match query_unescape(value, t) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("dropping query pair {:?}: value does not decode", pair);
                if first_err.is_none() {
                    first_err = Some(e);
                }
                continue;
            }
        };
        values.add(key, value);
    }

    Outcome::new(values, first_err)
}

/// Serialize `values` into a query string, keys sorted byte-wise.
///
/// Each key and each of its values is encoded with [`query_escape`], and the
/// `key=value` pairs are joined with `&`. Values under one key keep their order.
///
/// If a key fails to encode, all of its pairs are left out. If a single value
/// fails, only that pair is left out. Encoding continues either way and the
/// first error is returned alongside the string.
///
/// # Arguments
///
/// * `values` - The map to serialize
/// * `t` - The transform applied to every key and value before escaping
///
/// # Examples
///
/// ```
/// use query_transcode::{encode, Identity, Values};
///
/// let values = Values::new()
///     .with("q", "rust lang")
///     .with("a", "1")
///     .with("a", "2");
/// let query = encode(&values, &mut Identity).into_result().unwrap();
/// assert_eq!(query, "a=1&a=2&q=rust+lang");
/// ```
pub fn encode<T>(values: &Values, t: &mut T) -> Outcome<String, Error<T::Error>>
where
    T: Transform + ?Sized,
{
    let mut buf = String::new();
    let mut first_err = None;

    for key in values.sorted_keys() {
        let key_escaped = match query_escape(key, t) {
            Ok(k) => k,
            Err(e) => {
                log::debug!("dropping query key {:?}: key does not encode", key);
                if first_err.is_none() {
                    first_err = Some(e);
                }
                continue;
            }
        };
        for value in values.get_all(key) {
            let value_escaped = match query_escape(value, t) {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("dropping a value of query key {:?}: value does not encode", key);
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                    continue;
                }
            };
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(&key_escaped);
            buf.push('=');
            buf.push_str(&value_escaped);
        }
    }

    Outcome::new(buf, first_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{from_fn, Identity};
    use alloc::vec::Vec;
    use core::convert::Infallible;

    #[test]
    fn parse_simple() {
        let values = parse("a=1&b=2", &mut Identity).into_result().unwrap();
        assert_eq!(values, Values::new().with("a", "1").with("b", "2"));
    }

    #[test]
    fn parse_repeated_key() {
        let values = parse("a=1&a=2&a=banana", &mut Identity).into_result().unwrap();
        assert_eq!(values.get_all("a"), ["1", "2", "banana"]);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn parse_skips_empty_pairs() {
        let values = parse("&&a=1;;b=2&", &mut Identity).into_result().unwrap();
        assert_eq!(values, Values::new().with("a", "1").with("b", "2"));
        assert!(parse("", &mut Identity).into_result().unwrap().is_empty());
        assert!(parse("&;&", &mut Identity).into_result().unwrap().is_empty());
    }

    #[test]
    fn parse_splits_on_first_equals() {
        let values = parse("eq=a=b&bare&empty=", &mut Identity).into_result().unwrap();
        assert_eq!(values.get("eq"), Some("a=b"));
        assert_eq!(values.get("bare"), Some(""));
        assert_eq!(values.get("empty"), Some(""));
    }

    #[test]
    fn parse_keeps_going_after_errors() {
        let outcome = parse("x=%zz&a=1&%q=2&a=%9&b=2", &mut Identity);
        assert_eq!(
            outcome.error(),
            Some(&Error::MalformedEscape { fragment: b"%zz".to_vec() })
        );
        let (values, _) = outcome.into_parts();
        assert_eq!(values, Values::new().with("a", "1").with("b", "2"));
    }

    #[test]
    fn parse_unescapes_keys() {
        let values = parse("first+name=Ada&last%5Fname=Lovelace", &mut Identity)
            .into_result()
            .unwrap();
        assert_eq!(values.get("first name"), Some("Ada"));
        assert_eq!(values.get("last_name"), Some("Lovelace"));
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode(&Values::new(), &mut Identity).into_result().unwrap(), "");
    }

    #[test]
    fn encode_sorts_keys() {
        let values: Values = [("zeta", "1"), ("alpha", "2"), ("Mid", "3")].into_iter().collect();
        assert_eq!(
            encode(&values, &mut Identity).into_result().unwrap(),
            "Mid=3&alpha=2&zeta=1"
        );
    }

    #[test]
    fn encode_escapes_keys_and_values() {
        let values = Values::new().with("a b", "1+1").with("a b", "x&y");
        assert_eq!(
            encode(&values, &mut Identity).into_result().unwrap(),
            "a+b=1%2B1&a+b=x%26y"
        );
    }

    /// Rejects any field containing `!`.
    fn no_bang() -> impl Transform<Error = &'static str> {
        from_fn(|b: &[u8]| {
            if b.contains(&b'!') {
                Err("bang")
            } else {
                Ok(b.to_vec())
            }
        })
    }

    #[test]
    fn encode_drops_whole_key_when_key_fails() {
        let values = Values::new()
            .with("bad!", "1")
            .with("bad!", "2")
            .with("good", "3");
        let (query, err) = encode(&values, &mut no_bang()).into_parts();
        assert_eq!(query, "good=3");
        assert_eq!(err, Some(Error::Transform("bang")));
    }

    #[test]
    fn encode_drops_only_failing_value() {
        let values = Values::new()
            .with("k", "1")
            .with("k", "oops!")
            .with("k", "3");
        let (query, err) = encode(&values, &mut no_bang()).into_parts();
        assert_eq!(query, "k=1&k=3");
        assert_eq!(err, Some(Error::Transform("bang")));
    }

    #[test]
    fn parse_reports_transform_errors() {
        let (values, err) = parse("a=hi!&b=ok", &mut no_bang()).into_parts();
        assert_eq!(values, Values::new().with("b", "ok"));
        assert_eq!(err, Some(Error::Transform("bang")));
    }

    #[test]
    fn each_field_is_transformed_once() {
        let mut calls = Vec::new();
        let mut t = from_fn(|b: &[u8]| {
            calls.push(b.to_vec());
            Ok::<_, Infallible>(b.to_vec())
        });
        parse("k=v&x", &mut t).into_result().unwrap();
        drop(t);
        assert_eq!(calls, [b"k".to_vec(), b"v".to_vec(), b"x".to_vec(), Vec::new()]);
    }

    #[test]
    fn round_trip_through_identity() {
        let values = Values::new()
            .with("name", "Ada Lovelace")
            .with("tags", "a&b")
            .with("tags", "c=d;e")
            .with("percent", "100%")
            .with("plus", "1+2");
        let query = encode(&values, &mut Identity).into_result().unwrap();
        assert_eq!(parse(&query, &mut Identity).into_result().unwrap(), values);
    }
}
