//! Serde deserializer reading from [`Value`].
//!
//! The inverse of [`to_value`](crate::to_value): any type implementing
//! [`serde::Deserialize`] can be read back out of a value tree. Strings are
//! borrowed from the value when the target type allows it.
//!
//! # Quick Start
//!
//! ```
//! use serde::Deserialize;
//! use datum::{Value, from_value};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Order<'a> {
//!     id: i64,
//!     side: &'a str,
//!     note: Option<String>,
//! }
//!
//! let value = Value::make_object([
//!     ("id", Value::make_int(9)),
//!     ("side", Value::make_string("buy")),
//!     ("note", Value::make_null()),
//! ]);
//!
//! let order: Order = from_value(&value).unwrap();
//! assert_eq!(order, Order { id: 9, side: "buy", note: None });
//! ```
//!
//! # Value to Rust Mapping
//!
//! | Value | Rust |
//! |-------|------|
//! | `Zero`, `Null` | `None`, `()` |
//! | `Phantom` | `()`, unit structs |
//! | `Int` | any integer type that can hold it |
//! | `Float` | `f32`, `f64` |
//! | `Bool` | `bool` |
//! | `String` | `&str`, `String`, `char`; invalid UTF-8 only as bytes |
//! | `Time` | `#[serde(with = "datum::time")]` fields, or a `(seconds, nanos)` tuple |
//! | `Duration` | `#[serde(with = "datum::duration")]` fields, or a `(seconds, nanos)` tuple |
//! | `Tuple` | `Vec<T>`, tuples, tuple structs |
//! | `Object` | structs, `HashMap<String, T>`, `BTreeMap<String, T>` |
//!
//! Enums are not part of the value model and fail with
//! [`Error::UnsupportedNativeType`].

use std::slice;

use serde::{
    Deserialize,
    de::{
        self, DeserializeSeed, IntoDeserializer,
        value::{BorrowedStrDeserializer, SeqDeserializer},
    },
};

use crate::{
    Depth, Error, Limits, Result, Tag, Value,
    error::cold_path,
    with::{DURATION_NEWTYPE, TIME_NEWTYPE},
};

/// Deserializer implementing [`serde::Deserializer`] over a borrowed
/// [`Value`].
///
/// For most use cases, prefer the convenience functions [`from_value`] and
/// [`from_value_with`].
#[derive(Clone, Copy, Debug)]
pub struct Deserializer<'de> {
    value: &'de Value,
    depth: Depth,
}

impl<'de> Deserializer<'de> {
    #[inline]
    pub fn new(value: &'de Value, limits: &Limits) -> Self {
        Self {
            value,
            depth: Depth::new(limits),
        }
    }
}

/// Reads a `T` out of `value`.
///
/// # Errors
///
/// Returns an error if:
/// - The value does not have the shape `T` expects ([`Error::Message`])
/// - `T` contains an enum ([`Error::UnsupportedNativeType`])
/// - A temporal field holds the wrong kind of value ([`Error::TagMismatch`])
/// - Nesting is deeper than [`Limits::DEFAULT`] allows ([`Error::DepthLimitExceeded`])
#[inline]
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(value, &Limits::DEFAULT))
}

/// Like [`from_value`], with explicit limits.
#[inline]
pub fn from_value_with<'de, T>(value: &'de Value, limits: &Limits) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(value, limits))
}

fn visit_temporal<'de, V>(seconds: i64, nanos: i32, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let mut parts = SeqDeserializer::<_, Error>::new([seconds, nanos as i64].into_iter());
    let value = visitor.visit_seq(&mut parts)?;
    parts.end()?;
    Ok(value)
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Zero | Value::Null | Value::Phantom => visitor.visit_unit(),
            Value::Int(v) => visitor.visit_i64(*v),
            Value::Float(v) => visitor.visit_f64(*v),
            Value::Bool(v) => visitor.visit_bool(*v),
            Value::String(v) => match v.to_str() {
                Ok(s) => visitor.visit_borrowed_str(s),
                Err(_) => visitor.visit_borrowed_bytes(v.as_bytes()),
            },
            Value::Time(v) => visit_temporal(v.seconds, v.nanos, visitor),
            Value::Duration(v) => visit_temporal(v.seconds, v.nanos, visitor),
            Value::Tuple(v) => visitor.visit_seq(SeqAccess {
                iter: v.iter(),
                depth: self.depth.descend()?,
            }),
            Value::Object(v) => visitor.visit_map(MapAccess {
                iter: v.iter(),
                value: None,
                depth: self.depth.descend()?,
            }),
        }
    }

    #[inline]
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Zero | Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(v) => visitor.visit_borrowed_bytes(v.as_bytes()),
            _ => self.deserialize_any(visitor),
        }
    }

    #[inline]
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match (name, self.value) {
            (TIME_NEWTYPE, Value::Time(v)) => visit_temporal(v.seconds, v.nanos, visitor),
            (DURATION_NEWTYPE, Value::Duration(v)) => {
                visit_temporal(v.seconds, v.nanos, visitor)
            }
            (TIME_NEWTYPE, other) => {
                cold_path();
                Err(Error::TagMismatch(Tag::Time, other.tag()))
            }
            (DURATION_NEWTYPE, other) => {
                cold_path();
                Err(Error::TagMismatch(Tag::Duration, other.tag()))
            }
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        cold_path();
        tracing::debug!(native_type = name, "rejecting enum target");
        Err(Error::UnsupportedNativeType(format!("enum {name}").into()))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        unit unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }

    #[inline]
    fn is_human_readable(&self) -> bool {
        false
    }
}

struct SeqAccess<'de> {
    iter: slice::Iter<'de, Value>,
    depth: Depth,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed
                .deserialize(Deserializer {
                    value,
                    depth: self.depth,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapAccess<'de> {
    iter: std::collections::btree_map::Iter<'de, String, Value>,
    value: Option<&'de Value>,
    depth: Depth,
}

impl<'de> de::MapAccess<'de> for MapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::new(key.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer {
                value,
                depth: self.depth,
            }),
            None => {
                cold_path();
                Err(Error::Message(
                    "next_value_seed called before next_key_seed".into(),
                ))
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

impl<'de> IntoDeserializer<'de, Error> for &'de Value {
    type Deserializer = Deserializer<'de>;

    #[inline]
    fn into_deserializer(self) -> Deserializer<'de> {
        Deserializer::new(self, &Limits::DEFAULT)
    }
}
