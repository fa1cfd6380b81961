//! The key to values multi-map filled by parsing.

use alloc::string::String;
use alloc::vec::Vec;

use crate::FxHashMap;

/// Query keys mapped to their values, in the order the values were added.
///
/// Keys are unique and unordered; the values under one key keep their
/// insertion order. [`parse`](crate::parse) fills a fresh `Values` in the order
/// pairs appear in the query, and [`encode`](crate::encode) writes them back in
/// the same order under sorted keys.
///
/// # Examples
///
/// ```
/// use query_transcode::Values;
///
/// let mut values = Values::new()
///     .with("fruit", "apple")
///     .with("fruit", "banana");
/// values.add("count", "2");
///
/// assert_eq!(values.get("fruit"), Some("apple"));
/// assert_eq!(values.get_all("fruit"), ["apple", "banana"]);
/// assert_eq!(values.len(), 2);
///
/// values.set("fruit", "cherry");
/// assert_eq!(values.get_all("fruit"), ["cherry"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    map: FxHashMap<String, Vec<String>>,
}

impl Values {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key` and return the map, for building literals.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// Append a value under `key`, after any existing ones.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), alloc::vec![value.into()]);
    }

    /// The first value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(|vs| vs.first()).map(String::as_str)
    }

    /// Every value under `key`, oldest first. Empty if the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove `key` and return its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.map.remove(key)
    }

    /// Returns `true` if `key` has been added, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Keys with their values, keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, vs)| (k.as_str(), vs.as_slice()))
    }

    /// Keys in byte-wise ascending order.
    pub(crate) fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort_unstable();
        keys
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}

impl IntoIterator for Values {
    type Item = (String, Vec<String>);
    type IntoIter = hashbrown::hash_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl From<FxHashMap<String, Vec<String>>> for Values {
    fn from(map: FxHashMap<String, Vec<String>>) -> Self {
        Self { map }
    }
}
