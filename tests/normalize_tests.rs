//! Tests for ToValue normalization

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration as StdDuration, UNIX_EPOCH};

use bytes::Bytes;
use chrono::{FixedOffset, TimeDelta, TimeZone, Utc};
use datum::{Error, Limits, Phantom, RawBytes, Str, Tag, ToValue, Value};

#[test]
fn test_integers_widen() {
    assert_eq!(i8::MIN.to_value().unwrap(), Value::make_int(-128));
    assert_eq!(i16::MAX.to_value().unwrap(), Value::make_int(32767));
    assert_eq!(7_i32.to_value().unwrap(), Value::make_int(7));
    assert_eq!(i64::MIN.to_value().unwrap(), Value::make_int(i64::MIN));
    assert_eq!((-3_isize).to_value().unwrap(), Value::make_int(-3));
    assert_eq!(u8::MAX.to_value().unwrap(), Value::make_int(255));
    assert_eq!(u16::MAX.to_value().unwrap(), Value::make_int(65535));
    assert_eq!(u32::MAX.to_value().unwrap(), Value::make_int(4_294_967_295));
    assert_eq!(12_usize.to_value().unwrap(), Value::make_int(12));
}

#[test]
fn test_unsigned_overflow_is_rejected() {
    assert_eq!(
        (i64::MAX as u64).to_value().unwrap(),
        Value::make_int(i64::MAX)
    );
    assert_eq!(
        (i64::MAX as u64 + 1).to_value(),
        Err(Error::IntOutOfRange("9223372036854775808".into()))
    );
    assert!(matches!(
        u64::MAX.to_value(),
        Err(Error::IntOutOfRange(_))
    ));
}

#[test]
fn test_i128_range_checked() {
    assert_eq!((-5_i128).to_value().unwrap(), Value::make_int(-5));
    assert!(matches!(
        (i64::MIN as i128 - 1).to_value(),
        Err(Error::IntOutOfRange(_))
    ));
    assert!(matches!(u128::MAX.to_value(), Err(Error::IntOutOfRange(_))));
}

#[test]
fn test_floats_and_bools() {
    assert_eq!(1.5_f32.to_value().unwrap(), Value::make_float(1.5));
    assert_eq!(0.25_f64.to_value().unwrap(), Value::make_float(0.25));
    assert_eq!(true.to_value().unwrap(), Value::make_bool(true));
}

#[test]
fn test_text() {
    let expected = Value::make_string("abc");
    assert_eq!("abc".to_value().unwrap(), expected);
    assert_eq!(String::from("abc").to_value().unwrap(), expected);
    assert_eq!(Cow::Borrowed("abc").to_value().unwrap(), expected);
    assert_eq!('é'.to_value().unwrap(), Value::make_string("é"));
    assert_eq!(Str::from("abc").to_value().unwrap(), expected);
}

#[test]
fn test_raw_bytes_stay_verbatim() {
    let raw = vec![0x66, 0x6f, 0xff];
    let value = RawBytes(&raw).to_value().unwrap();
    assert_eq!(value.tag(), Tag::String);
    assert_eq!(value.as_bytes(), &raw[..]);

    let value = Bytes::from_static(b"\x00\x01").to_value().unwrap();
    assert_eq!(value.as_bytes(), b"\x00\x01");
}

#[test]
fn test_byte_vec_is_a_sequence() {
    let value = vec![1_u8, 2].to_value().unwrap();
    assert_eq!(
        value,
        Value::make_tuple([Value::make_int(1), Value::make_int(2)])
    );
}

#[test]
fn test_sequences() {
    let expected = Value::make_tuple([Value::make_int(1), Value::make_int(2)]);
    assert_eq!(vec![1_i64, 2].to_value().unwrap(), expected);
    assert_eq!([1_i64, 2].to_value().unwrap(), expected);
    assert_eq!([1_i64, 2][..].to_value().unwrap(), expected);
    assert_eq!(VecDeque::from([1_i64, 2]).to_value().unwrap(), expected);
    assert_eq!(Vec::<i64>::new().to_value().unwrap(), Value::zero_tuple());
}

#[test]
fn test_maps() {
    let expected = Value::make_object([
        ("a", Value::make_int(1)),
        ("b", Value::make_int(2)),
    ]);
    let hash = HashMap::from([("b", 2_i32), ("a", 1)]);
    let btree = BTreeMap::from([("a".to_string(), 1_u8), ("b".to_string(), 2)]);
    assert_eq!(hash.to_value().unwrap(), expected);
    assert_eq!(btree.to_value().unwrap(), expected);
}

#[test]
fn test_option_and_pointers() {
    assert_eq!(None::<i32>.to_value().unwrap(), Value::make_null());
    assert_eq!(Some(3_i32).to_value().unwrap(), Value::make_int(3));
    assert_eq!(Some(None::<i32>).to_value().unwrap(), Value::make_null());
    assert_eq!(Box::new(3_i32).to_value().unwrap(), Value::make_int(3));
    assert_eq!(Rc::new("s").to_value().unwrap(), Value::make_string("s"));
    assert_eq!(Arc::new(true).to_value().unwrap(), Value::make_bool(true));
    assert_eq!((&&4_u16).to_value().unwrap(), Value::make_int(4));
}

#[test]
fn test_units() {
    assert_eq!(().to_value().unwrap(), Value::make_phantom());
    assert_eq!(Phantom.to_value().unwrap(), Value::make_phantom());
}

#[test]
fn test_temporal_inputs() {
    let utc = Utc.with_ymd_and_hms(2021, 5, 4, 10, 0, 0).unwrap();
    let offset = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2021, 5, 4, 12, 0, 0)
        .unwrap();
    assert_eq!(offset.to_value().unwrap(), utc.to_value().unwrap());
    assert_eq!(utc.to_value().unwrap().as_time().unwrap(), utc);

    let system = UNIX_EPOCH + StdDuration::new(1_620_122_400, 0);
    assert_eq!(system.to_value().unwrap(), utc.to_value().unwrap());

    let delta = TimeDelta::milliseconds(-1500);
    assert_eq!(delta.to_value().unwrap().as_duration().unwrap(), delta);
    assert_eq!(
        StdDuration::from_millis(1500).to_value().unwrap(),
        TimeDelta::milliseconds(1500).to_value().unwrap()
    );
}

#[test]
fn test_system_time_before_epoch() {
    let before = UNIX_EPOCH - StdDuration::new(1, 250_000_000);
    let value = before.to_value().unwrap();
    assert_eq!(value.show(), "1969-12-31T23:59:58.750000000Z");
}

#[test]
fn test_normalize_is_idempotent() {
    let value = Value::make_tuple([
        Value::make_int(1),
        Value::make_object([("k", Value::make_phantom())]),
        Value::zero(),
    ]);
    assert_eq!(value.to_value().unwrap(), value);
    assert_eq!(value.to_value().unwrap().to_value().unwrap(), value);
}

#[test]
fn test_nested_composites() {
    let row = vec![HashMap::from([("ids", vec![Some(1_u32), None])])];
    assert_eq!(row.to_value().unwrap().show(), "({ids: (1, <null>)})");
}

#[test]
fn test_depth_limit() {
    let nested = vec![vec![vec![1_i64]]];
    assert!(nested.to_value_with(&Limits { max_depth: 3 }).is_ok());
    assert_eq!(
        nested.to_value_with(&Limits { max_depth: 2 }),
        Err(Error::DepthLimitExceeded(2))
    );
    assert_eq!(
        1_i64.to_value_with(&Limits { max_depth: 0 }),
        Ok(Value::make_int(1))
    );
    assert_eq!(
        Vec::<i64>::new().to_value_with(&Limits { max_depth: 0 }),
        Err(Error::DepthLimitExceeded(0))
    );
}

#[test]
fn test_passthrough_respects_depth_limit() {
    let mut value = Value::make_int(1);
    for _ in 0..200_000 {
        value = Value::make_tuple([value]);
    }
    assert_eq!(
        value.to_value(),
        Err(Error::DepthLimitExceeded(Limits::DEFAULT.max_depth))
    );
    assert_eq!(
        vec![value].to_value(),
        Err(Error::DepthLimitExceeded(Limits::DEFAULT.max_depth))
    );
}

#[test]
fn test_passthrough_depth_matches_native_nesting() {
    let native = vec![vec![vec![1_i64]]];
    let value = native.to_value().unwrap();
    let limits = Limits { max_depth: 3 };
    assert_eq!(value.to_value_with(&limits), native.to_value_with(&limits));

    let limits = Limits { max_depth: 2 };
    assert_eq!(value.to_value_with(&limits), Err(Error::DepthLimitExceeded(2)));
    assert_eq!(
        value.try_tuple().unwrap().to_value_with(&limits),
        Err(Error::DepthLimitExceeded(2))
    );

    let object = Value::make_object([("k", Value::make_object([("k", Value::zero())]))]);
    assert!(object.to_value_with(&Limits { max_depth: 2 }).is_ok());
    assert_eq!(
        object.try_object().unwrap().to_value_with(&Limits { max_depth: 1 }),
        Err(Error::DepthLimitExceeded(1))
    );
}

#[test]
fn test_parallel_normalization() {
    let handles: Vec<_> = (0..4_i64)
        .map(|i| std::thread::spawn(move || vec![i; 3].to_value().unwrap()))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let value = handle.join().unwrap();
        assert_eq!(value.as_tuple().len(), 3);
        assert_eq!(value.get(0), Some(&Value::make_int(i as i64)));
    }
}
