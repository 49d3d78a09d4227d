use std::{mem, slice};

use crate::Value;

use super::drop_nested;

/// An ordered sequence of values, the payload of [`Value::Tuple`].
///
/// Built once from an iterator or a `Vec` and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
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
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.0.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    #[inline]
    pub fn into_vec(mut self) -> Vec<Value> {
        mem::take(&mut self.0)
    }

    #[inline]
    pub(crate) fn take_items(&mut self) -> Vec<Value> {
        mem::take(&mut self.0)
    }
}

impl Drop for Tuple {
    fn drop(&mut self) {
        drop_nested(self.take_items());
    }
}

impl From<Vec<Value>> for Tuple {
    #[inline]
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Tuple {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Tuple {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
