//! Normalization of native Rust values into [`Value`].
//!
//! | Native type | Value |
//! |-------------|-------|
//! | `None` | `Null` |
//! | `bool` | `Bool` |
//! | `i8`..`i64`, `isize`, `u8`..`u64`, `usize` | `Int`, widened to `i64` |
//! | `i128`, `u128` (with the `i128` feature) | `Int` |
//! | `f32`, `f64` | `Float` |
//! | `str`, `String`, `Cow<str>`, `char` | `String` |
//! | [`RawBytes`], `Bytes`, [`Str`] | `String`, bytes kept verbatim |
//! | `[T]`, `Vec<T>`, `[T; N]`, `VecDeque<T>` | `Tuple` |
//! | `HashMap<K, T>`, `BTreeMap<K, T>` with `K: AsRef<str>` | `Object` |
//! | `Some(T)`, `&T`, `Box<T>`, `Rc<T>`, `Arc<T>` | whatever `T` normalizes to |
//! | `DateTime<Tz>`, `SystemTime` | `Time` |
//! | `TimeDelta`, `std::time::Duration` | `Duration` |
//! | `()`, [`Phantom`] | `Phantom` |
//! | [`Value`] | itself |
//!
//! Unsigned integers above `i64::MAX` are rejected with
//! [`Error::IntOutOfRange`] rather than wrapped or saturated.
//!
//! Anything else does not implement [`ToValue`] and is rejected at compile
//! time. Values whose type is only known at runtime go through
//! [`Value::from_any`] or the serde bridge instead.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::{
    Depth, Duration, Error, Limits, Object, Phantom, Result, Str, Timestamp, Tuple, Value,
    error::cold_path,
};

/// Conversion of a native value into a [`Value`].
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use datum::{ToValue, Value};
///
/// let row = HashMap::from([("id".to_string(), vec![1_u8, 2])]);
/// let value = row.to_value().unwrap();
///
/// assert_eq!(
///     value,
///     Value::make_object([(
///         "id",
///         Value::make_tuple([Value::make_int(1), Value::make_int(2)]),
///     )])
/// );
/// ```
pub trait ToValue {
    /// Normalizes `self` with a recursion budget. Containers must call
    /// [`Depth::descend`] once before normalizing their elements.
    fn to_value_at(&self, depth: Depth) -> Result<Value>;

    /// Normalizes `self` under [`Limits::DEFAULT`].
    #[inline]
    fn to_value(&self) -> Result<Value> {
        self.to_value_at(Depth::default())
    }

    #[inline]
    fn to_value_with(&self, limits: &Limits) -> Result<Value> {
        self.to_value_at(Depth::new(limits))
    }
}

/// Marks a byte buffer as raw text for the normalizer.
///
/// A plain `Vec<u8>` is a sequence and normalizes to a Tuple of Ints; wrapping
/// it in `RawBytes` turns it into a String holding the bytes verbatim, with no
/// UTF-8 validation.
///
/// ```
/// use datum::{RawBytes, ToValue};
///
/// let value = RawBytes(b"ok\xff").to_value().unwrap();
/// assert_eq!(value.as_bytes(), b"ok\xff");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawBytes<B>(pub B);

pub(crate) fn int_out_of_range(repr: impl ToString) -> Error {
    cold_path();
    let repr = repr.to_string();
    tracing::debug!(value = %repr, "integer does not fit in a 64-bit int");
    Error::IntOutOfRange(repr)
}

pub(crate) fn tuple_from<'a, T, I>(items: I, depth: Depth) -> Result<Value>
where
    T: ToValue + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let depth = depth.descend()?;
    items
        .into_iter()
        .map(|item| item.to_value_at(depth))
        .collect::<Result<Tuple>>()
        .map(Value::Tuple)
}

pub(crate) fn object_from<'a, K, T, I>(entries: I, depth: Depth) -> Result<Value>
where
    K: AsRef<str> + 'a,
    T: ToValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a T)>,
{
    let depth = depth.descend()?;
    entries
        .into_iter()
        .map(|(key, item)| Ok::<_, Error>((key.as_ref(), item.to_value_at(depth)?)))
        .collect::<Result<Object>>()
        .map(Value::Object)
}

macro_rules! lossless_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToValue for $t {
                #[inline]
                fn to_value_at(&self, _: Depth) -> Result<Value> {
                    Ok(Value::Int(*self as i64))
                }
            }
        )*
    };
}

lossless_int!(i8, i16, i32, i64, isize, u8, u16, u32);

macro_rules! checked_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToValue for $t {
                #[inline]
                fn to_value_at(&self, _: Depth) -> Result<Value> {
                    i64::try_from(*self)
                        .map(Value::Int)
                        .map_err(|_| int_out_of_range(self))
                }
            }
        )*
    };
}

checked_int!(u64, usize);

#[cfg(feature = "i128")]
checked_int!(i128, u128);

impl ToValue for f32 {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Float(*self as f64))
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Float(*self))
    }
}

impl ToValue for bool {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl ToValue for str {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self)))
    }
}

impl ToValue for String {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self.as_str())))
    }
}

impl ToValue for Cow<'_, str> {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self.as_ref())))
    }
}

impl ToValue for char {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self.encode_utf8(&mut [0; 4]) as &str)))
    }
}

impl ToValue for Str {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl ToValue for Bytes {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self.clone())))
    }
}

impl<B: AsRef<[u8]>> ToValue for RawBytes<B> {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::String(Str::from(self.0.as_ref())))
    }
}

impl<T: ToValue> ToValue for [T] {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        tuple_from(self, depth)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        tuple_from(self, depth)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        tuple_from(self, depth)
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        tuple_from(self, depth)
    }
}

impl<K: AsRef<str>, T: ToValue, S> ToValue for HashMap<K, T, S> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        object_from(self, depth)
    }
}

impl<K: AsRef<str>, T: ToValue> ToValue for BTreeMap<K, T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        object_from(self, depth)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        match self {
            Some(value) => value.to_value_at(depth),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        (**self).to_value_at(depth)
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        (**self).to_value_at(depth)
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        (**self).to_value_at(depth)
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        (**self).to_value_at(depth)
    }
}

impl<Tz: TimeZone> ToValue for DateTime<Tz> {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Timestamp::from_datetime(&self.with_timezone(&Utc)).map(Value::Time)
    }
}

impl ToValue for SystemTime {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Timestamp::from_system_time(*self).map(Value::Time)
    }
}

impl ToValue for TimeDelta {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Duration::from_time_delta(self).map(Value::Duration)
    }
}

impl ToValue for std::time::Duration {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Duration::from_std(self).map(Value::Duration)
    }
}

impl ToValue for () {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Phantom)
    }
}

impl ToValue for Phantom {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Phantom)
    }
}

// Walks already-built values with an explicit stack, charging each container
// one level, so the clone that follows never recurses past the budget.
fn check_nesting<'a>(values: impl IntoIterator<Item = &'a Value>, depth: Depth) -> Result<()> {
    let mut stack: Vec<(&Value, Depth)> = values.into_iter().map(|v| (v, depth)).collect();
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Tuple(items) => {
                let depth = depth.descend()?;
                stack.extend(items.iter().map(|v| (v, depth)));
            }
            Value::Object(entries) => {
                let depth = depth.descend()?;
                stack.extend(entries.values().map(|v| (v, depth)));
            }
            _ => {}
        }
    }
    Ok(())
}

impl ToValue for Value {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        check_nesting([self], depth)?;
        Ok(self.clone())
    }
}

impl ToValue for Tuple {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        check_nesting(self, depth.descend()?)?;
        Ok(Value::Tuple(self.clone()))
    }
}

impl ToValue for Object {
    #[inline]
    fn to_value_at(&self, depth: Depth) -> Result<Value> {
        check_nesting(self.values(), depth.descend()?)?;
        Ok(Value::Object(self.clone()))
    }
}

impl ToValue for Timestamp {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Time(*self))
    }
}

impl ToValue for Duration {
    #[inline]
    fn to_value_at(&self, _: Depth) -> Result<Value> {
        Ok(Value::Duration(*self))
    }
}
