use std::collections::{BTreeMap, HashMap, btree_map};
use std::mem;

use crate::Value;

use super::drop_nested;

/// A string-keyed mapping of values, the payload of [`Value::Object`].
///
/// Keys are unique and kept sorted, so two objects built from the same pairs
/// in any insertion order are equal and iterate (and render) identically.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Object(BTreeMap<String, Value>);

impl Object {
    #[inline]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    #[inline]
    pub fn values(&self) -> btree_map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Iterates entries in key order.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Copies the entries out into a fresh map.
    #[inline]
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.0.clone()
    }

    #[inline]
    pub fn into_map(mut self) -> BTreeMap<String, Value> {
        mem::take(&mut self.0)
    }

    #[inline]
    pub(crate) fn take_values(&mut self) -> btree_map::IntoValues<String, Value> {
        mem::take(&mut self.0).into_values()
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        drop_nested(self.take_values().collect());
    }
}

impl From<BTreeMap<String, Value>> for Object {
    #[inline]
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self(entries)
    }
}

impl<S> From<HashMap<String, Value, S>> for Object {
    #[inline]
    fn from(entries: HashMap<String, Value, S>) -> Self {
        Self(entries.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.into_map().into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
