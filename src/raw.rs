use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    Depth, Duration, Error, Limits, Result, Str, Tag, Timestamp, ToValue, Value,
    normalize::{object_from, tuple_from},
};

/// A native, dynamically typed value tree.
///
/// This is what [`Value::to_raw_value`] hands back to code that wants plain
/// Rust values: temporal payloads are decoded into chrono types and
/// containers into `Vec`/`HashMap`. Both `Zero` and `Null` come back as
/// [`RawValue::Null`].
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Null,
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(Str),
    Time(DateTime<Utc>),
    Duration(TimeDelta),
    Seq(Vec<RawValue>),
    Map(HashMap<String, RawValue>),
}

impl RawValue {
    /// The [`Tag`] this raw value normalizes to.
    pub const fn tag(&self) -> Tag {
        match self {
            RawValue::Null => Tag::Null,
            RawValue::Unit => Tag::Phantom,
            RawValue::Int(_) => Tag::Int,
            RawValue::Float(_) => Tag::Float,
            RawValue::Bool(_) => Tag::Bool,
            RawValue::String(_) => Tag::String,
            RawValue::Time(_) => Tag::Time,
            RawValue::Duration(_) => Tag::Duration,
            RawValue::Seq(_) => Tag::Tuple,
            RawValue::Map(_) => Tag::Object,
        }
    }
}

impl Value {
    /// Converts back into native values.
    ///
    /// For any `v` produced by the normalizer,
    /// `v.to_raw_value()?.to_value()? == v`.
    ///
    /// # Errors
    ///
    /// - [`Error::TemporalDecode`] if a Time or Duration payload is malformed
    /// - [`Error::DepthLimitExceeded`] if nesting exceeds [`Limits::DEFAULT`]
    ///
    /// # Example
    ///
    /// ```
    /// use datum::{RawValue, ToValue, Value};
    ///
    /// let value = Value::make_tuple([Value::make_int(1), Value::make_phantom()]);
    /// let raw = value.to_raw_value().unwrap();
    ///
    /// assert_eq!(raw, RawValue::Seq(vec![RawValue::Int(1), RawValue::Unit]));
    /// assert_eq!(raw.to_value().unwrap(), value);
    /// ```
    #[inline]
    pub fn to_raw_value(&self) -> Result<RawValue> {
        self.to_raw_value_at(Depth::default())
    }

    #[inline]
    pub fn to_raw_value_with(&self, limits: &Limits) -> Result<RawValue> {
        self.to_raw_value_at(Depth::new(limits))
    }

    fn to_raw_value_at(&self, depth: Depth) -> Result<RawValue> {
        Ok(match self {
            Value::Zero | Value::Null => RawValue::Null,
            Value::Phantom => RawValue::Unit,
            Value::Int(v) => RawValue::Int(*v),
            Value::Float(v) => RawValue::Float(*v),
            Value::Bool(v) => RawValue::Bool(*v),
            Value::String(v) => RawValue::String(v.clone()),
            Value::Time(v) => RawValue::Time(v.to_datetime()?),
            Value::Duration(v) => RawValue::Duration(v.to_time_delta()?),
            Value::Tuple(v) => {
                let depth = depth.descend()?;
                RawValue::Seq(
                    v.iter()
                        .map(|item| item.to_raw_value_at(depth))
                        .collect::<Result<_>>()?,
                )
            }
            Value::Object(v) => {
                let depth = depth.descend()?;
                RawValue::Map(
                    v.iter()
                        .map(|(key, item)| {
                            Ok::<_, Error>((key.clone(), item.to_raw_value_at(depth)?))
                        })
                        .collect::<Result<_>>()?,
                )
            }
        })
    }
}

impl ToValue for RawValue {
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        match self {
            RawValue::Null => Ok(Value::Null),
            RawValue::Unit => Ok(Value::Phantom),
            RawValue::Int(v) => Ok(Value::Int(*v)),
            RawValue::Float(v) => Ok(Value::Float(*v)),
            RawValue::Bool(v) => Ok(Value::Bool(*v)),
            RawValue::String(v) => Ok(Value::String(v.clone())),
            RawValue::Time(v) => Timestamp::from_datetime(v).map(Value::Time),
            RawValue::Duration(v) => Duration::from_time_delta(v).map(Value::Duration),
            RawValue::Seq(v) => tuple_from(v, depth),
            RawValue::Map(v) => object_from(v, depth),
        }
    }
}

macro_rules! raw_scalar {
    ($($variant:ident => $t:ty, $tag:ident;)*) => {
        $(
            impl TryFrom<RawValue> for $t {
                type Error = Error;

                #[inline]
                fn try_from(value: RawValue) -> Result<Self> {
                    match value {
                        RawValue::$variant(v) => Ok(v),
                        other => Err(Error::TagMismatch(Tag::$tag, other.tag())),
                    }
                }
            }
        )*
    };
}

raw_scalar! {
    Int => i64, Int;
    Float => f64, Float;
    Bool => bool, Bool;
    String => Str, String;
    Time => DateTime<Utc>, Time;
    Duration => TimeDelta, Duration;
    Seq => Vec<RawValue>, Tuple;
    Map => HashMap<String, RawValue>, Object;
}

impl TryFrom<RawValue> for String {
    type Error = Error;

    /// Invalid UTF-8 is replaced with `U+FFFD`.
    #[inline]
    fn try_from(value: RawValue) -> Result<Self> {
        match value {
            RawValue::String(v) => Ok(v.decode().into_owned()),
            other => Err(Error::TagMismatch(Tag::String, other.tag())),
        }
    }
}
