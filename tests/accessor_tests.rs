//! Tests for the permissive as_* and strict try_* accessors

use chrono::{DateTime, TimeDelta, Utc};
use datum::{Duration, Error, Timestamp, Value};

#[test]
fn test_as_int_on_string_is_zero() {
    let value = Value::make_string("x");
    assert_eq!(value.as_int(), 0);
}

#[test]
fn test_mismatch_defaults() {
    let value = Value::make_int(5);
    assert_eq!(value.as_float(), 0.0);
    assert!(!value.as_bool());
    assert_eq!(value.as_string(), "");
    assert!(value.as_bytes().is_empty());
    assert!(value.as_tuple().is_empty());
    assert!(value.as_object().is_empty());
    assert_eq!(value.as_time().unwrap(), DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(value.as_duration().unwrap(), TimeDelta::zero());

    assert_eq!(Value::zero().as_int(), 0);
    assert_eq!(Value::make_null().as_string(), "");
}

#[test]
fn test_as_object_is_a_copy() {
    let value = Value::make_object([("k", Value::make_int(1))]);
    let mut copy = value.as_object();
    copy.insert("k".into(), Value::make_int(2));
    copy.insert("other".into(), Value::make_null());

    assert_eq!(value.get("k"), Some(&Value::make_int(1)));
    assert_eq!(value.as_object().len(), 1);
}

#[test]
fn test_as_string_decodes_lossily() {
    let value = Value::make_string(&b"ok\xff"[..]);
    assert_eq!(value.as_string(), "ok\u{FFFD}");
    assert_eq!(value.as_bytes(), b"ok\xff");
    assert!(value.try_str().unwrap().to_str().is_err());
}

#[test]
fn test_as_time_decode_error() {
    let value = Value::Time(Timestamp::from_parts(0, 2_000_000_000));
    assert!(matches!(value.as_time(), Err(Error::TemporalDecode(_))));

    let value = Value::Time(Timestamp::from_parts(i64::MAX, 0));
    assert!(matches!(value.as_time(), Err(Error::TemporalDecode(_))));
}

#[test]
fn test_as_duration_decode_error() {
    let value = Value::Duration(Duration::from_parts(1, -5));
    assert!(matches!(value.as_duration(), Err(Error::TemporalDecode(_))));

    let value = Value::Duration(Duration::from_parts(0, 1_000_000_000));
    assert!(matches!(value.as_duration(), Err(Error::TemporalDecode(_))));
}

#[test]
fn test_try_accessors() {
    assert_eq!(Value::make_int(3).try_int(), Some(3));
    assert_eq!(Value::make_string("3").try_int(), None);
    assert_eq!(Value::make_float(1.5).try_float(), Some(1.5));
    assert_eq!(Value::make_bool(false).try_bool(), Some(false));
    assert_eq!(Value::make_int(0).try_bool(), None);
    assert_eq!(
        Value::make_string("s").try_str().map(|s| s == "s"),
        Some(true)
    );
    assert_eq!(Value::zero_time().try_time(), Some(&Timestamp::EPOCH));
    assert_eq!(Value::zero_duration().try_duration(), Some(&Duration::ZERO));
    assert_eq!(Value::zero_tuple().try_tuple().map(|t| t.len()), Some(0));
    assert!(Value::zero_tuple().try_object().is_none());
    assert!(Value::zero_object().try_object().is_some());
}

#[test]
fn test_is_predicates() {
    let value = Value::make_float(1.0);
    assert!(value.is_float());
    assert!(!value.is_int());
    assert!(!value.is_zero());
    assert!(Value::make_phantom().is_phantom());
    assert!(Value::make_null().is_null());
    assert!(Value::zero_string().is_string());
    assert!(Value::zero_time().is_time());
    assert!(Value::zero_duration().is_duration());
    assert!(Value::zero_tuple().is_tuple());
    assert!(Value::zero_object().is_object());
    assert!(Value::zero_bool().is_bool());
}

#[test]
fn test_get_by_index_and_key() {
    let row = Value::make_tuple([
        Value::make_int(10),
        Value::make_object([("name", Value::make_string("n"))]),
    ]);
    assert_eq!(row.get(0), Some(&Value::make_int(10)));
    assert_eq!(row.get(2), None);
    assert_eq!(row.get("name"), None);

    let inner = row.get(1).unwrap();
    assert_eq!(inner.get("name"), Some(&Value::make_string("n")));
    assert_eq!(inner.get(String::from("name")), Some(&Value::make_string("n")));
    assert_eq!(inner.get("missing"), None);
    assert_eq!(Value::make_int(1).get(0), None);
}
