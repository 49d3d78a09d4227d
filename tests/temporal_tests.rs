//! Tests for the canonical temporal encoding

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use datum::temporal::{ENCODED_LEN, MAX_TIMESTAMP_SECONDS, MIN_TIMESTAMP_SECONDS};
use datum::{Duration, Error, Timestamp, Value};

#[test]
fn test_nanosecond_fidelity() {
    let at = DateTime::parse_from_rfc3339("2021-05-04T10:00:00.123456789Z")
        .unwrap()
        .with_timezone(&Utc);
    let value = Value::make_time(at).unwrap();
    let back = value.as_time().unwrap();
    assert_eq!(back, at);
    assert_eq!(back.timestamp_subsec_nanos(), 123_456_789);
}

#[test]
fn test_timestamp_parts() {
    let at = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap() + TimeDelta::nanoseconds(5);
    assert_eq!(
        Timestamp::from_datetime(&at),
        Ok(Timestamp::from_parts(1, 5))
    );

    let before = DateTime::<Utc>::UNIX_EPOCH - TimeDelta::nanoseconds(1);
    assert_eq!(
        Timestamp::from_datetime(&before),
        Ok(Timestamp::from_parts(-1, 999_999_999))
    );
}

#[test]
fn test_timestamp_range_bounds() {
    let min = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(min.timestamp(), MIN_TIMESTAMP_SECONDS);
    assert!(Timestamp::from_datetime(&min).is_ok());

    let max = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
    assert_eq!(max.timestamp(), MAX_TIMESTAMP_SECONDS);
    assert!(Timestamp::from_datetime(&(max + TimeDelta::nanoseconds(999_999_999))).is_ok());
    assert!(matches!(
        Timestamp::from_datetime(&(max + TimeDelta::seconds(1))),
        Err(Error::TemporalRange(_))
    ));
}

#[test]
fn test_leap_second_rejected() {
    let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
        .unwrap()
        .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
        .unwrap()
        .and_utc();
    assert!(matches!(
        Timestamp::from_datetime(&leap),
        Err(Error::TemporalRange(_))
    ));
}

#[test]
fn test_timestamp_validate() {
    assert!(Timestamp::EPOCH.validate().is_ok());
    assert!(Timestamp::from_parts(MIN_TIMESTAMP_SECONDS - 1, 0).validate().is_err());
    assert!(Timestamp::from_parts(0, -1).validate().is_err());
    assert!(Timestamp::from_parts(0, 1_000_000_000).validate().is_err());
}

#[test]
fn test_duration_sign_rules() {
    assert!(Duration::from_parts(-1, -1).validate().is_ok());
    assert!(Duration::from_parts(0, -1).validate().is_ok());
    assert!(Duration::from_parts(1, 1).validate().is_ok());
    assert!(Duration::from_parts(-1, 1).validate().is_err());
    assert!(Duration::from_parts(1, -1).validate().is_err());
    assert!(Duration::from_parts(0, -1_000_000_000).validate().is_err());
}

#[test]
fn test_duration_conversions() {
    let delta = TimeDelta::milliseconds(-2500);
    let duration = Duration::from_time_delta(&delta).unwrap();
    assert_eq!(duration, Duration::from_parts(-2, -500_000_000));
    assert_eq!(duration.to_time_delta(), Ok(delta));
    assert_eq!(duration.as_nanos(), -2_500_000_000);

    let span = std::time::Duration::new(3, 7);
    assert_eq!(Duration::from_std(&span), Ok(Duration::from_parts(3, 7)));
    assert!(matches!(
        Duration::from_std(&std::time::Duration::MAX),
        Err(Error::TemporalRange(_))
    ));
}

#[test]
fn test_flat_encoding() {
    let timestamp = Timestamp::from_parts(1, 2);
    let bytes = timestamp.to_bytes();
    assert_eq!(bytes.len(), ENCODED_LEN);
    assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2]);
    assert_eq!(Timestamp::from_bytes(&bytes), Ok(timestamp));

    let duration = Duration::from_parts(-1, -1);
    let bytes = duration.to_bytes();
    assert_eq!(bytes, [0xFF; ENCODED_LEN]);
    assert_eq!(Duration::from_bytes(&bytes), Ok(duration));
}

#[test]
fn test_flat_encoding_wrong_length() {
    assert!(matches!(
        Timestamp::from_bytes(&[0; 11]),
        Err(Error::TemporalDecode(_))
    ));
    assert!(matches!(
        Duration::from_bytes(&[0; 13]),
        Err(Error::TemporalDecode(_))
    ));
}

#[test]
fn test_flat_encoding_does_not_validate() {
    let mut bytes = [0u8; ENCODED_LEN];
    bytes[8..].copy_from_slice(&2_000_000_000_i32.to_be_bytes());
    let timestamp = Timestamp::from_bytes(&bytes).unwrap();
    assert!(matches!(
        timestamp.to_datetime(),
        Err(Error::TemporalDecode(_))
    ));
}
