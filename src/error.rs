//! Error types for building, decoding and converting values.
//!
//! This module contains the [`Error`] type which represents every failure the
//! value model can report. Reading a scalar accessor of the wrong kind is not
//! one of them: accessors fall back to the zero value of their return type.
//!
//! # Example
//!
//! ```
//! use datum::{Error, Result, ToValue, Value};
//!
//! fn normalize(input: u64) -> Result<Value> {
//!     match input.to_value() {
//!         Ok(value) => Ok(value),
//!         Err(Error::IntOutOfRange(repr)) => {
//!             println!("{repr} does not fit in a 64-bit signed int");
//!             Ok(Value::make_null())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//!
//! assert_eq!(normalize(u64::MAX).unwrap(), Value::make_null());
//! ```

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::Tag;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Marks the enclosing branch as the unlikely one.
#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

/// This type represents all possible errors that can occur when building,
/// decoding or converting values.
///
/// # Variants
///
/// - [`UnsupportedNativeType`](Error::UnsupportedNativeType) - the normalizer was handed a type outside the value model
/// - [`TemporalRange`](Error::TemporalRange) - a time or duration does not fit the canonical temporal encoding
/// - [`TemporalDecode`](Error::TemporalDecode) - a stored temporal payload is malformed
/// - [`DepthLimitExceeded`](Error::DepthLimitExceeded) - nesting went deeper than [`Limits::max_depth`](crate::Limits)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Message(String),

    /// The normalizer was given a native type the value model cannot express.
    ///
    /// This is a caller contract violation, not bad data: the offending type
    /// is named so the call site can be fixed.
    UnsupportedNativeType(Cow<'static, str>),

    /// An integer does not fit in a 64-bit signed `Int`.
    ///
    /// Carries the decimal form of the rejected input.
    IntOutOfRange(String),

    /// A timestamp or duration lies outside the range of the canonical
    /// temporal encoding.
    TemporalRange(String),

    /// A stored temporal payload cannot be decoded back into a native
    /// timestamp or duration.
    TemporalDecode(String),

    /// Nesting exceeded the configured maximum depth.
    DepthLimitExceeded(usize),

    /// A raw discriminant outside the closed set of tags.
    InvalidTag(u8),

    /// Map key must be a string.
    ///
    /// Objects are keyed by strings. This error is returned when normalizing
    /// a map with non-string keys.
    KeyMustBeString,

    /// The value has a different kind than the one being read.
    ///
    /// The first tag is the expected kind, the second the actual one.
    TagMismatch(Tag, Tag),
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::UnsupportedNativeType(name) => {
                write!(formatter, "unsupported native type: {name}")
            }
            Error::IntOutOfRange(repr) => {
                write!(formatter, "integer out of range for a 64-bit int: {repr}")
            }
            Error::TemporalRange(detail) => {
                write!(formatter, "temporal value out of range: {detail}")
            }
            Error::TemporalDecode(detail) => {
                write!(formatter, "invalid temporal payload: {detail}")
            }
            Error::DepthLimitExceeded(max) => {
                write!(formatter, "nesting depth limit exceeded: {max}")
            }
            Error::InvalidTag(tag) => write!(formatter, "invalid value tag: {tag:#04x}"),
            Error::KeyMustBeString => formatter.write_str("map key must be a string"),
            Error::TagMismatch(expected, actual) => {
                write!(formatter, "tag mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
