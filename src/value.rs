use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Duration, Index, Result, Tag, Timestamp};

mod object;
mod show;
mod string;
mod tuple;

pub use object::*;
pub use show::*;
pub use string::*;
pub use tuple::*;

// Frees a tree of values without recursing: children are moved onto `stack`
// and each container is dropped only once it is empty.
fn drop_nested(mut stack: Vec<Value>) {
    while let Some(mut value) = stack.pop() {
        match &mut value {
            Value::Tuple(items) => stack.extend(items.take_items()),
            Value::Object(entries) => stack.extend(entries.take_values()),
            _ => {}
        }
    }
}

/// A self-describing runtime value.
///
/// Exactly one variant is active at a time and the variant *is* the type:
/// [`tag`](Value::tag) is derived from it, so the kind and the payload can
/// never disagree. Containers expose no mutable access to their elements, so
/// a value is read-only once built and can be shared across threads freely.
///
/// `Zero` is the never-set sentinel ([`Value::default`]); it is never produced
/// by normalizing real data. `Null` is explicitly absent data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Zero,
    Null,
    /// A marker carrying no data.
    Phantom,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(Str),
    Time(Timestamp),
    Duration(Duration),
    Tuple(Tuple),
    Object(Object),
}

/// Native unit marker, normalized to [`Value::Phantom`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Phantom;

impl Value {
    /// The `Zero` sentinel.
    #[inline]
    pub const fn zero() -> Self {
        Value::Zero
    }

    #[inline]
    pub const fn make_null() -> Self {
        Value::Null
    }

    #[inline]
    pub const fn zero_null() -> Self {
        Value::Null
    }

    #[inline]
    pub const fn make_phantom() -> Self {
        Value::Phantom
    }

    #[inline]
    pub const fn zero_phantom() -> Self {
        Value::Phantom
    }

    #[inline]
    pub const fn make_int(value: i64) -> Self {
        Value::Int(value)
    }

    /// An `Int` holding `0`. This is not the `Zero` sentinel.
    #[inline]
    pub const fn zero_int() -> Self {
        Value::Int(0)
    }

    #[inline]
    pub const fn make_float(value: f64) -> Self {
        Value::Float(value)
    }

    #[inline]
    pub const fn zero_float() -> Self {
        Value::Float(0.0)
    }

    #[inline]
    pub const fn make_bool(value: bool) -> Self {
        Value::Bool(value)
    }

    #[inline]
    pub const fn zero_bool() -> Self {
        Value::Bool(false)
    }

    #[inline]
    pub fn make_string(value: impl Into<Str>) -> Self {
        Value::String(value.into())
    }

    #[inline]
    pub const fn zero_string() -> Self {
        Value::String(Str::new())
    }

    /// Builds a Time value.
    ///
    /// # Errors
    ///
    /// [`Error::TemporalRange`](crate::Error::TemporalRange) if the instant is
    /// outside years 1..=9999 or falls on a leap second.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use datum::Value;
    ///
    /// let at = Utc.with_ymd_and_hms(2021, 5, 4, 10, 0, 0).unwrap();
    /// let value = Value::make_time(at).unwrap();
    /// assert_eq!(value.as_time().unwrap(), at);
    /// ```
    pub fn make_time(value: DateTime<Utc>) -> Result<Self> {
        Timestamp::from_datetime(&value).map(Value::Time)
    }

    /// A Time value at the Unix epoch.
    #[inline]
    pub const fn zero_time() -> Self {
        Value::Time(Timestamp::EPOCH)
    }

    /// Builds a Duration value.
    ///
    /// # Errors
    ///
    /// [`Error::TemporalRange`](crate::Error::TemporalRange) if the span is
    /// longer than about ten thousand years in either direction.
    pub fn make_duration(value: TimeDelta) -> Result<Self> {
        Duration::from_time_delta(&value).map(Value::Duration)
    }

    #[inline]
    pub const fn zero_duration() -> Self {
        Value::Duration(Duration::ZERO)
    }

    /// Builds a Tuple from values, in order.
    ///
    /// # Example
    ///
    /// ```
    /// use datum::Value;
    ///
    /// let row = Value::make_tuple([Value::make_int(1), Value::make_string("x")]);
    /// assert_eq!(row.show(), "(1, 'x')");
    /// ```
    #[inline]
    pub fn make_tuple(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(values.into_iter().collect())
    }

    #[inline]
    pub const fn zero_tuple() -> Self {
        Value::Tuple(Tuple::new())
    }

    /// Builds an Object from key/value pairs. A repeated key keeps its last
    /// value.
    #[inline]
    pub fn make_object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(entries.into_iter().collect())
    }

    #[inline]
    pub const fn zero_object() -> Self {
        Value::Object(Object::new())
    }
}

impl Value {
    /// Returns the kind of the active variant.
    #[inline]
    pub const fn tag(&self) -> Tag {
        match self {
            Value::Zero => Tag::Zero,
            Value::Null => Tag::Null,
            Value::Phantom => Tag::Phantom,
            Value::Int(_) => Tag::Int,
            Value::Float(_) => Tag::Float,
            Value::Bool(_) => Tag::Bool,
            Value::String(_) => Tag::String,
            Value::Time(_) => Tag::Time,
            Value::Duration(_) => Tag::Duration,
            Value::Tuple(_) => Tag::Tuple,
            Value::Object(_) => Tag::Object,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Zero)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_phantom(&self) -> bool {
        matches!(self, Value::Phantom)
    }

    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_time(&self) -> bool {
        matches!(self, Value::Time(_))
    }

    #[inline]
    pub fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(_))
    }

    #[inline]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

// Permissive accessors: the caller is expected to have checked `tag()` first.
// A mismatch yields the zero value of the return type instead of an error.
impl Value {
    #[inline]
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(value) => *value,
            _ => 0,
        }
    }

    #[inline]
    pub fn as_float(&self) -> f64 {
        match self {
            Value::Float(value) => *value,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(value) => *value,
            _ => false,
        }
    }

    /// The string payload, decoded lossily if it is not valid UTF-8.
    #[inline]
    pub fn as_string(&self) -> Cow<'_, str> {
        match self {
            Value::String(value) => value.decode(),
            _ => Cow::Borrowed(""),
        }
    }

    /// The string payload as stored, byte for byte.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::String(value) => value.as_bytes(),
            _ => &[],
        }
    }

    /// Decodes the Time payload. Any other variant yields the Unix epoch.
    ///
    /// # Errors
    ///
    /// [`Error::TemporalDecode`](crate::Error::TemporalDecode) if the stored
    /// payload is malformed.
    #[inline]
    pub fn as_time(&self) -> Result<DateTime<Utc>> {
        match self {
            Value::Time(value) => value.to_datetime(),
            _ => Ok(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Decodes the Duration payload. Any other variant yields zero.
    ///
    /// # Errors
    ///
    /// [`Error::TemporalDecode`](crate::Error::TemporalDecode) if the stored
    /// payload is malformed.
    #[inline]
    pub fn as_duration(&self) -> Result<TimeDelta> {
        match self {
            Value::Duration(value) => value.to_time_delta(),
            _ => Ok(TimeDelta::zero()),
        }
    }

    #[inline]
    pub fn as_tuple(&self) -> &[Value] {
        match self {
            Value::Tuple(value) => value.as_slice(),
            _ => &[],
        }
    }

    /// A copy of the Object's entries. Changing the returned map does not
    /// affect `self`.
    #[inline]
    pub fn as_object(&self) -> BTreeMap<String, Value> {
        match self {
            Value::Object(value) => value.to_map(),
            _ => BTreeMap::new(),
        }
    }
}

// Strict accessors for callers that prefer to match on presence.
impl Value {
    #[inline]
    pub fn try_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_str(&self) -> Option<&Str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_time(&self) -> Option<&Timestamp> {
        match self {
            Value::Time(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_duration(&self) -> Option<&Duration> {
        match self {
            Value::Duration(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn try_object(&self) -> Option<&Object> {
        match self {
            Value::Object(value) => Some(value),
            _ => None,
        }
    }

    /// Looks up a tuple element by position or an object entry by key.
    ///
    /// # Example
    ///
    /// ```
    /// use datum::Value;
    ///
    /// let row = Value::make_object([("id", Value::make_int(7))]);
    /// assert_eq!(row.get("id"), Some(&Value::make_int(7)));
    /// assert_eq!(row.get(0), None);
    /// ```
    #[inline]
    pub fn get<I: Index>(&self, index: I) -> Option<&Value> {
        index.lookup(self)
    }
}
