//! Ordered map type for tagged-JSON objects.
//!
//! This module provides [`TagMap`], a wrapper around [`IndexMap`] that
//! maintains insertion order for object entries. Unlike a JSON object, keys
//! are full [`Value`]s: the source data model allows integer, float, tuple,
//! and reference keys, and the codec tags them into strings only at the wire
//! boundary.
//!
//! ## Why IndexMap?
//!
//! `IndexMap` instead of `HashMap` ensures:
//!
//! - **Deterministic output**: entries serialize in a consistent order
//! - **Iteration order**: entries iterate in insertion order
//! - **Compatibility**: predictable output for testing and debugging
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{TagMap, Value};
//!
//! let mut map = TagMap::new();
//! map.insert(Value::from("name"), Value::from("Alice"));
//! map.insert(Value::from(5), Value::from("numeric key"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&Value::from("name")).and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of [`Value`] keys to [`Value`]s.
///
/// Key uniqueness follows `Value`'s equality: floats compare by bit pattern
/// and fixed-width scalars compare numerically across widths. Note that two
/// distinct keys may still encode to the same tagged string on the wire (a
/// native `5` key and a fixed-width `5` scalar key both become `__int__(5)`);
/// the codec does not detect this and the later entry wins.
///
/// # Examples
///
/// ```rust
/// use tagson::{TagMap, Value};
///
/// let mut map = TagMap::new();
/// map.insert(Value::from("first"), Value::from(1));
/// map.insert(Value::from("second"), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec![Value::from("first"), Value::from("second")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagMap(IndexMap<Value, Value>);

impl TagMap {
    /// Creates an empty `TagMap`.
    #[must_use]
    pub fn new() -> Self {
        TagMap(IndexMap::new())
    }

    /// Creates an empty `TagMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TagMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::{TagMap, Value};
    ///
    /// let mut map = TagMap::new();
    /// assert!(map.insert(Value::from("key"), Value::from(42)).is_none());
    /// assert!(map.insert(Value::from("key"), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a string key without allocating a `Value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::{TagMap, Value};
    ///
    /// let mut map = TagMap::new();
    /// map.insert(Value::from("key"), Value::from(42));
    /// assert_eq!(map.get_str("key").and_then(|v| v.as_i64()), Some(42));
    /// ```
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.0.iter()
    }
}

impl IntoIterator for TagMap {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagMap {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        TagMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn test_numeric_keys() {
        let mut map = TagMap::new();
        map.insert(Value::from(5), Value::from("int"));
        map.insert(Value::from(2.5), Value::from("float"));

        assert_eq!(
            map.get(&Value::from(5)).and_then(|v| v.as_str()),
            Some("int")
        );
        assert_eq!(
            map.get(&Value::from(2.5)).and_then(|v| v.as_str()),
            Some("float")
        );
    }

    #[test]
    fn test_scalar_key_width_insensitive() {
        let mut map = TagMap::new();
        map.insert(Value::Scalar(Scalar::I32(7)), Value::from("a"));

        // numeric equality across widths makes this the same key
        let old = map.insert(Value::Scalar(Scalar::I64(7)), Value::from("b"));
        assert!(old.is_some());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = TagMap::new();
        map.insert(Value::from("z"), Value::from(1));
        map.insert(Value::from("a"), Value::from(2));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("z"), Value::from("a")]);
    }
}
