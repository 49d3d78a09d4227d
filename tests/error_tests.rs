//! Tests for the Error type

use datum::{Error, Tag};

#[test]
fn test_error_display_unsupported_native_type() {
    let error = Error::UnsupportedNativeType("fn(i32) -> i32".into());
    assert_eq!(error.to_string(), "unsupported native type: fn(i32) -> i32");
}

#[test]
fn test_error_display_int_out_of_range() {
    let error = Error::IntOutOfRange(u64::MAX.to_string());
    assert_eq!(
        error.to_string(),
        "integer out of range for a 64-bit int: 18446744073709551615"
    );
}

#[test]
fn test_error_display_temporal() {
    let error = Error::TemporalRange("duration 1s".into());
    assert_eq!(error.to_string(), "temporal value out of range: duration 1s");

    let error = Error::TemporalDecode("bad".into());
    assert_eq!(error.to_string(), "invalid temporal payload: bad");
}

#[test]
fn test_error_display_depth_limit() {
    let error = Error::DepthLimitExceeded(256);
    assert_eq!(error.to_string(), "nesting depth limit exceeded: 256");
}

#[test]
fn test_error_display_invalid_tag() {
    let error = Error::InvalidTag(0xFF);
    assert_eq!(error.to_string(), "invalid value tag: 0xff");
}

#[test]
fn test_error_display_key_must_be_string() {
    assert_eq!(Error::KeyMustBeString.to_string(), "map key must be a string");
}

#[test]
fn test_error_display_tag_mismatch() {
    let error = Error::TagMismatch(Tag::Time, Tag::Int);
    assert_eq!(error.to_string(), "tag mismatch: expected time, got int");
}

#[test]
fn test_error_display_message() {
    let error = Error::Message("custom".into());
    assert_eq!(error.to_string(), "custom");
}

#[test]
fn test_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&Error::KeyMustBeString);
}

#[test]
fn test_error_serde_custom() {
    let error = <Error as serde::ser::Error>::custom("from ser");
    assert_eq!(error, Error::Message("from ser".into()));

    let error = <Error as serde::de::Error>::custom("from de");
    assert_eq!(error, Error::Message("from de".into()));
}
