//! Serde serializer producing [`Value`].
//!
//! This is the dynamic end of the normalizer: any type implementing
//! [`serde::Serialize`] can be turned into a [`Value`] without a hand-written
//! [`ToValue`](crate::ToValue) impl.
//!
//! # Quick Start
//!
//! ```
//! use serde::Serialize;
//! use datum::to_value;
//!
//! #[derive(Serialize)]
//! struct Quote {
//!     symbol: String,
//!     bid: f64,
//!     levels: Vec<u32>,
//! }
//!
//! let quote = Quote { symbol: "ABC".into(), bid: 1.5, levels: vec![1, 2] };
//! let value = to_value(&quote).unwrap();
//!
//! assert_eq!(value.show(), "{bid: 1.5, levels: (1, 2), symbol: 'ABC'}");
//! ```
//!
//! # Rust to Value Mapping
//!
//! | Rust | Value |
//! |------|-------|
//! | `bool` | `Bool` |
//! | `i8`..`i64`, `u8`..`u64` | `Int` (unsigned above `i64::MAX` is an error) |
//! | `i128`, `u128` (with the `i128` feature) | `Int`, range checked |
//! | `f32`, `f64` | `Float` |
//! | `char`, `&str`, `String` | `String` |
//! | bytes (`serde_bytes`) | `String`, bytes kept verbatim |
//! | `None` | `Null` |
//! | `Some(T)`, newtype structs | the inner value |
//! | `()`, unit structs | `Phantom` |
//! | sequences, tuples, tuple structs | `Tuple` |
//! | maps with string keys, structs | `Object` |
//! | fields with `#[serde(with = "datum::time")]` | `Time` |
//! | fields with `#[serde(with = "datum::duration")]` | `Duration` |
//!
//! Enum variants have no counterpart in the value model and fail with
//! [`Error::UnsupportedNativeType`]. Maps whose keys do not serialize as
//! strings fail with [`Error::KeyMustBeString`].

use std::collections::BTreeMap;

use serde::{
    Serialize,
    ser::{self, Impossible},
};

use crate::{
    Depth, Duration, Error, Limits, Result, Str, Timestamp, Value,
    error::cold_path,
    normalize::int_out_of_range,
    with::{DURATION_NEWTYPE, TIME_NEWTYPE},
};

/// Serializer implementing [`serde::Serializer`] with [`Value`] as output.
///
/// For most use cases, prefer the convenience functions [`to_value`] and
/// [`to_value_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer {
    depth: Depth,
}

impl Serializer {
    #[inline]
    pub fn new(limits: &Limits) -> Self {
        Self {
            depth: Depth::new(limits),
        }
    }
}

/// Normalize any serializable value.
///
/// # Errors
///
/// Returns an error if:
/// - An enum variant is encountered ([`Error::UnsupportedNativeType`])
/// - A map key is not a string ([`Error::KeyMustBeString`])
/// - An integer does not fit in 64 signed bits ([`Error::IntOutOfRange`])
/// - Nesting is deeper than [`Limits::DEFAULT`] allows ([`Error::DepthLimitExceeded`])
#[inline]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer::default())
}

/// Like [`to_value`], with explicit limits.
#[inline]
pub fn to_value_with<T>(value: &T, limits: &Limits) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer::new(limits))
}

fn unsupported(name: &'static str, variant: &'static str) -> Error {
    cold_path();
    tracing::debug!(native_type = name, variant, "rejecting enum variant");
    Error::UnsupportedNativeType(format!("enum variant {name}::{variant}").into())
}

// The (seconds, nanos) pair of a temporal field is part of a scalar, so it is
// serialized on a budget of its own rather than the caller's.
const PARTS_LIMITS: Limits = Limits { max_depth: 1 };

fn temporal_parts<T>(value: &T) -> Result<(i64, i32)>
where
    T: ?Sized + Serialize,
{
    let parts = value.serialize(Serializer::new(&PARTS_LIMITS))?;
    match parts.as_tuple() {
        [Value::Int(seconds), Value::Int(nanos)] => {
            let nanos = i32::try_from(*nanos)
                .map_err(|_| Error::TemporalDecode(format!("nanos {nanos} out of range")))?;
            Ok((*seconds, nanos))
        }
        _ => {
            cold_path();
            Err(Error::TemporalDecode(format!(
                "expected (seconds, nanos), got {parts}"
            )))
        }
    }
}

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = Impossible<Value, Error>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    #[cfg(feature = "i128")]
    #[inline]
    fn serialize_i128(self, v: i128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| int_out_of_range(v))
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(v as i64))
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| int_out_of_range(v))
    }

    #[cfg(feature = "i128")]
    #[inline]
    fn serialize_u128(self, v: u128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| int_out_of_range(v))
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    #[inline]
    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(Str::from(v.encode_utf8(&mut [0; 4]) as &str)))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(Str::from(v)))
    }

    #[inline]
    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::String(Str::from(v)))
    }

    #[inline]
    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Phantom)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Err(unsupported(name, variant))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        match name {
            TIME_NEWTYPE => {
                let (seconds, nanos) = temporal_parts(value)?;
                let timestamp = Timestamp::from_parts(seconds, nanos);
                timestamp.validate()?;
                Ok(Value::Time(timestamp))
            }
            DURATION_NEWTYPE => {
                let (seconds, nanos) = temporal_parts(value)?;
                let duration = Duration::from_parts(seconds, nanos);
                duration.validate()?;
                Ok(Value::Duration(duration))
            }
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported(name, variant))
    }

    #[inline]
    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
            depth: self.depth.descend()?,
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(name, variant))
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer> {
        Ok(MapSerializer {
            entries: BTreeMap::new(),
            next_key: None,
            depth: self.depth.descend()?,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapSerializer> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(name, variant))
    }

    #[inline]
    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Collects the elements of a sequence, tuple or tuple struct.
pub struct SeqSerializer {
    items: Vec<Value>,
    depth: Depth,
}

impl SeqSerializer {
    #[inline]
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let item = value.serialize(Serializer { depth: self.depth })?;
        self.items.push(item);
        Ok(())
    }

    #[inline]
    fn finish(self) -> Result<Value> {
        Ok(Value::Tuple(self.items.into()))
    }
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        self.finish()
    }
}

/// Collects the entries of a map or the fields of a struct.
pub struct MapSerializer {
    entries: BTreeMap<String, Value>,
    next_key: Option<String>,
    depth: Depth,
}

impl MapSerializer {
    #[inline]
    fn serializer(&self) -> Serializer {
        Serializer { depth: self.depth }
    }
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Byte keys are accepted only when they are valid UTF-8.
        let key = match key.serialize(self.serializer())? {
            Value::String(key) => key.to_str().map(str::to_owned).ok(),
            _ => None,
        };
        match key {
            Some(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            None => {
                cold_path();
                Err(Error::KeyMustBeString)
            }
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Message("serialize_value called before serialize_key".into()))?;
        let value = value.serialize(self.serializer())?;
        self.entries.insert(key, value);
        Ok(())
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.entries.into()))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(self.serializer())?;
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.entries.into()))
    }
}
