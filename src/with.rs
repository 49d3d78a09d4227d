//! Serde modules for chrono fields.
//!
//! chrono's own serde support writes timestamps as strings, which would
//! normalize to a `String` value. These modules write the canonical
//! `(seconds, nanos)` pair instead, wrapped in a marker newtype that
//! [`to_value`](crate::to_value) recognizes:
//!
//! | Module | Field type | Value |
//! |--------|------------|-------|
//! | [`time`] | `DateTime<Utc>` | `Time` |
//! | [`duration`] | `TimeDelta` | `Duration` |
//!
//! Other serializers see a plain two-element tuple, so the same struct still
//! round-trips through formats such as JSON.
//!
//! ```
//! use chrono::{DateTime, TimeDelta, TimeZone, Utc};
//! use serde::{Deserialize, Serialize};
//! use datum::{from_value, to_value};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Session {
//!     #[serde(with = "datum::time")]
//!     started: DateTime<Utc>,
//!     #[serde(with = "datum::duration")]
//!     idle: TimeDelta,
//! }
//!
//! let session = Session {
//!     started: Utc.with_ymd_and_hms(2021, 5, 4, 10, 0, 0).unwrap(),
//!     idle: TimeDelta::milliseconds(1500),
//! };
//!
//! let value = to_value(&session).unwrap();
//! assert_eq!(value.show(), "{idle: 1.5s, started: 2021-05-04T10:00:00.000000000Z}");
//!
//! let back: Session = from_value(&value).unwrap();
//! assert_eq!(back, session);
//! ```

use std::fmt;

use serde::{Deserializer, de};

use crate::{Duration, Timestamp};

pub(crate) const TIME_NEWTYPE: &str = "datum:time";
pub(crate) const DURATION_NEWTYPE: &str = "datum:duration";

struct PartsVisitor(&'static str);

impl<'de> de::Visitor<'de> for PartsVisitor {
    type Value = (i64, i32);

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a {} as (seconds, nanos)", self.0)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_tuple(2, self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let seconds = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let nanos = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(3, &self));
        }
        Ok((seconds, nanos))
    }
}

fn deserialize_parts<'de, D>(
    deserializer: D,
    name: &'static str,
    what: &'static str,
) -> Result<(i64, i32), D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(name, PartsVisitor(what))
}

/// Serde module for `DateTime<Utc>` as a Time value.
pub mod time {
    use chrono::{DateTime, Utc};
    use serde::{Deserializer, Serializer, de::Error as _, ser::Error as _};

    use super::*;

    /// Fails for instants the Time encoding cannot hold: years outside
    /// 1..=9999 and leap seconds.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let timestamp = Timestamp::from_datetime(value).map_err(S::Error::custom)?;
        serializer.serialize_newtype_struct(TIME_NEWTYPE, &(timestamp.seconds, timestamp.nanos))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (seconds, nanos) = deserialize_parts(deserializer, TIME_NEWTYPE, "timestamp")?;
        Timestamp::from_parts(seconds, nanos)
            .to_datetime()
            .map_err(D::Error::custom)
    }
}

/// Serde module for `TimeDelta` as a Duration value.
pub mod duration {
    use chrono::TimeDelta;
    use serde::{Deserializer, Serializer, de::Error as _, ser::Error as _};

    use super::*;

    pub fn serialize<S>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = Duration::from_time_delta(value).map_err(S::Error::custom)?;
        serializer.serialize_newtype_struct(DURATION_NEWTYPE, &(duration.seconds, duration.nanos))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (seconds, nanos) = deserialize_parts(deserializer, DURATION_NEWTYPE, "duration")?;
        Duration::from_parts(seconds, nanos)
            .to_time_delta()
            .map_err(D::Error::custom)
    }
}
