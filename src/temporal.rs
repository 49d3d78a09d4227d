//! Canonical temporal encoding.
//!
//! Time and Duration values store their payload as whole seconds plus a
//! nanosecond remainder, the same split used by common wire schemas. The
//! payload types here are plain data: building them from raw parts never
//! fails, and validation happens when converting from or to native chrono
//! types.
//!
//! | Type | seconds | nanos |
//! |------|---------|-------|
//! | [`Timestamp`] | `-62135596800 ..= 253402300799` (years 1 to 9999) | `0 .. 1e9` |
//! | [`Duration`] | `-315576000000 ..= 315576000000` (about 10000 years) | `-1e9 < n < 1e9`, same sign as seconds |
//!
//! Both also have a fixed 12-byte big-endian layout (`i64` seconds followed by
//! `i32` nanos) for encoders that want a flat representation.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use zerocopy::byteorder::{BigEndian, I32, I64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result, error::cold_path};

pub(crate) const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Seconds of `0001-01-01T00:00:00Z` relative to the Unix epoch.
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// Seconds of `9999-12-31T23:59:59Z` relative to the Unix epoch.
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;
/// About ten thousand years.
pub const MAX_DURATION_SECONDS: i64 = 315_576_000_000;

/// Length of the flat encoding produced by [`Timestamp::to_bytes`] and
/// [`Duration::to_bytes`].
pub const ENCODED_LEN: usize = 12;

#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct Encoded {
    seconds: I64<BigEndian>,
    nanos: I32<BigEndian>,
}

impl Encoded {
    fn new(seconds: i64, nanos: i32) -> Self {
        Self {
            seconds: I64::new(seconds),
            nanos: I32::new(nanos),
        }
    }

    fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out.copy_from_slice(self.as_bytes());
        out
    }

    fn read(bytes: &[u8], what: &str) -> Result<(i64, i32)> {
        match Encoded::read_from_bytes(bytes) {
            Ok(encoded) => Ok((encoded.seconds.get(), encoded.nanos.get())),
            Err(_) => {
                cold_path();
                Err(Error::TemporalDecode(format!(
                    "{what} encoding must be {ENCODED_LEN} bytes, got {}",
                    bytes.len()
                )))
            }
        }
    }
}

/// An absolute point in time, UTC, with nanosecond resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    /// Seconds since `1970-01-01T00:00:00Z`.
    pub seconds: i64,
    /// Non-negative fraction of a second, in nanoseconds.
    pub nanos: i32,
}

impl Timestamp {
    /// The Unix epoch, which is also the zero value.
    pub const EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    /// Builds a payload from raw parts without validating them.
    #[inline]
    pub const fn from_parts(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Checks that the payload lies in the representable range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&self.seconds) {
            cold_path();
            return Err(Error::TemporalDecode(format!(
                "timestamp seconds {} outside 0001-01-01..=9999-12-31",
                self.seconds
            )));
        }
        if !(0..NANOS_PER_SECOND).contains(&self.nanos) {
            cold_path();
            return Err(Error::TemporalDecode(format!(
                "timestamp nanos {} outside [0, 1e9)",
                self.nanos
            )));
        }
        Ok(())
    }

    /// Encodes a chrono timestamp.
    ///
    /// Fails with [`Error::TemporalRange`] for years outside 1..=9999 and for
    /// leap-second instants, which the encoding cannot represent.
    pub fn from_datetime(value: &DateTime<Utc>) -> Result<Self> {
        let nanos = value.timestamp_subsec_nanos();
        if nanos >= NANOS_PER_SECOND as u32 {
            cold_path();
            return Err(Error::TemporalRange(format!("leap second at {value}")));
        }
        Self::checked(value.timestamp(), nanos as i32)
    }

    /// Encodes a system time.
    pub fn from_system_time(value: SystemTime) -> Result<Self> {
        let (seconds, nanos) = match value.duration_since(UNIX_EPOCH) {
            Ok(after) => (after.as_secs(), after.subsec_nanos() as i32),
            Err(before) => {
                let before = before.duration();
                let seconds = before.as_secs();
                let nanos = before.subsec_nanos() as i32;
                let seconds = i64::try_from(seconds).map_err(|_| time_range(&value))?;
                return if nanos == 0 {
                    Self::checked(-seconds, 0)
                } else {
                    Self::checked(-seconds - 1, NANOS_PER_SECOND - nanos)
                };
            }
        };
        let seconds = i64::try_from(seconds).map_err(|_| time_range(&value))?;
        Self::checked(seconds, nanos)
    }

    fn checked(seconds: i64, nanos: i32) -> Result<Self> {
        let timestamp = Self { seconds, nanos };
        timestamp
            .validate()
            .map_err(|_| Error::TemporalRange(format!("timestamp {seconds}s {nanos}ns")))?;
        Ok(timestamp)
    }

    /// Decodes back into a chrono timestamp.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.validate()?;
        DateTime::from_timestamp(self.seconds, self.nanos as u32).ok_or_else(|| {
            Error::TemporalDecode(format!("timestamp {}s {}ns", self.seconds, self.nanos))
        })
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        Encoded::new(self.seconds, self.nanos).to_bytes()
    }

    /// Reads the flat encoding. The parts are not validated here; decoding
    /// with [`to_datetime`](Self::to_datetime) does that.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (seconds, nanos) = Encoded::read(bytes, "timestamp")?;
        Ok(Self { seconds, nanos })
    }
}

fn time_range(value: &SystemTime) -> Error {
    Error::TemporalRange(format!("system time {value:?}"))
}

/// A signed span of time with nanosecond resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    pub seconds: i64,
    /// Fraction of a second; carries the sign of `seconds` when both are
    /// non-zero.
    pub nanos: i32,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        seconds: 0,
        nanos: 0,
    };

    /// Builds a payload from raw parts without validating them.
    #[inline]
    pub const fn from_parts(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn validate(&self) -> Result<()> {
        if !(-MAX_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&self.seconds) {
            cold_path();
            return Err(Error::TemporalDecode(format!(
                "duration seconds {} outside +-{MAX_DURATION_SECONDS}",
                self.seconds
            )));
        }
        if self.nanos <= -NANOS_PER_SECOND || self.nanos >= NANOS_PER_SECOND {
            cold_path();
            return Err(Error::TemporalDecode(format!(
                "duration nanos {} outside (-1e9, 1e9)",
                self.nanos
            )));
        }
        if (self.seconds < 0 && self.nanos > 0) || (self.seconds > 0 && self.nanos < 0) {
            cold_path();
            return Err(Error::TemporalDecode(format!(
                "duration {}s {}ns has mismatched signs",
                self.seconds, self.nanos
            )));
        }
        Ok(())
    }

    /// Encodes a chrono duration, failing with [`Error::TemporalRange`] for
    /// spans beyond about ten thousand years.
    pub fn from_time_delta(value: &TimeDelta) -> Result<Self> {
        Self::checked(value.num_seconds(), value.subsec_nanos())
    }

    /// Encodes an unsigned std duration.
    pub fn from_std(value: &std::time::Duration) -> Result<Self> {
        let seconds = i64::try_from(value.as_secs())
            .map_err(|_| Error::TemporalRange(format!("duration {value:?}")))?;
        Self::checked(seconds, value.subsec_nanos() as i32)
    }

    fn checked(seconds: i64, nanos: i32) -> Result<Self> {
        let duration = Self { seconds, nanos };
        duration
            .validate()
            .map_err(|_| Error::TemporalRange(format!("duration {seconds}s {nanos}ns")))?;
        Ok(duration)
    }

    /// Decodes back into a chrono duration.
    pub fn to_time_delta(&self) -> Result<TimeDelta> {
        self.validate()?;
        TimeDelta::try_seconds(self.seconds)
            .and_then(|seconds| seconds.checked_add(&TimeDelta::nanoseconds(self.nanos as i64)))
            .ok_or_else(|| {
                Error::TemporalDecode(format!("duration {}s {}ns", self.seconds, self.nanos))
            })
    }

    /// Total length in nanoseconds. Exact for every payload, valid or not.
    #[inline]
    pub const fn as_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        Encoded::new(self.seconds, self.nanos).to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (seconds, nanos) = Encoded::read(bytes, "duration")?;
        Ok(Self { seconds, nanos })
    }
}

/// Writes a timestamp as RFC 3339 with all nine fractional digits and a `Z`
/// offset, e.g. `2021-05-04T10:00:00.123456789Z`.
pub(crate) fn write_datetime(f: &mut impl fmt::Write, value: &DateTime<Utc>) -> fmt::Result {
    f.write_str(&value.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

/// Writes a duration with the canonical unit decomposition.
///
/// * zero is `0s`
/// * under one second: a single `ns`, `µs` or `ms` unit with a trimmed
///   decimal fraction (`750ns`, `1.5µs`, `12.000001ms`)
/// * otherwise `<h>h<m>m<s>[.<frac>]s`, leading zero units omitted except that
///   minutes follow hours (`1h0m0s`, `2m3s`, `4.25s`)
///
/// Negative spans get a leading `-`.
pub(crate) fn write_duration(f: &mut impl fmt::Write, value: &Duration) -> fmt::Result {
    let total = value.as_nanos();
    if total == 0 {
        return f.write_str("0s");
    }
    if total < 0 {
        f.write_char('-')?;
    }
    let total = total.unsigned_abs();
    let nanos_per_second = NANOS_PER_SECOND as u128;
    if total < nanos_per_second {
        let (unit, scale, width) = if total < 1_000 {
            ("ns", 1, 0)
        } else if total < 1_000_000 {
            ("µs", 1_000, 3)
        } else {
            ("ms", 1_000_000, 6)
        };
        write_fraction(f, total / scale, total % scale, width)?;
        return f.write_str(unit);
    }
    let seconds = total / nanos_per_second;
    let hours = seconds / 3600;
    let minutes = seconds / 60 % 60;
    if hours > 0 {
        write!(f, "{hours}h")?;
    }
    if hours > 0 || minutes > 0 {
        write!(f, "{minutes}m")?;
    }
    write_fraction(f, seconds % 60, total % nanos_per_second, 9)?;
    f.write_char('s')
}

fn write_fraction(f: &mut impl fmt::Write, whole: u128, frac: u128, width: usize) -> fmt::Result {
    write!(f, "{whole}")?;
    if frac == 0 {
        return Ok(());
    }
    let digits = format!("{frac:0width$}");
    write!(f, ".{}", digits.trim_end_matches('0'))
}
