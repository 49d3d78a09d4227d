//! Tests for the Tag enum

use datum::{Error, Tag, Value};

#[test]
fn test_tag_values() {
    assert_eq!(Tag::Zero as u8, 0);
    assert_eq!(Tag::Null as u8, 1);
    assert_eq!(Tag::Phantom as u8, 2);
    assert_eq!(Tag::Int as u8, 3);
    assert_eq!(Tag::Float as u8, 4);
    assert_eq!(Tag::Bool as u8, 5);
    assert_eq!(Tag::String as u8, 6);
    assert_eq!(Tag::Time as u8, 7);
    assert_eq!(Tag::Duration as u8, 8);
    assert_eq!(Tag::Tuple as u8, 9);
    assert_eq!(Tag::Object as u8, 10);
}

#[test]
fn test_tag_all_in_discriminant_order() {
    for (i, tag) in Tag::ALL.iter().enumerate() {
        assert_eq!(*tag as usize, i);
        assert_eq!(Tag::from_u8(i as u8), Some(*tag));
    }
}

#[test]
fn test_tag_try_from_u8() {
    assert_eq!(Tag::try_from(0u8), Ok(Tag::Zero));
    assert_eq!(Tag::try_from(10u8), Ok(Tag::Object));
    assert_eq!(Tag::try_from(11u8), Err(Error::InvalidTag(11)));
    assert_eq!(Tag::try_from(0xFFu8), Err(Error::InvalidTag(0xFF)));
    assert_eq!(u8::from(Tag::Duration), 8);
}

#[test]
fn test_tag_classification() {
    for tag in Tag::ALL {
        let classes = [
            tag.is_unit(),
            tag.is_scalar(),
            tag.is_composite(),
        ];
        assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{tag}");
    }

    assert!(Tag::Zero.is_unit());
    assert!(Tag::Phantom.is_unit());
    assert!(Tag::String.is_scalar());
    assert!(Tag::Time.is_temporal());
    assert!(Tag::Duration.is_temporal());
    assert!(!Tag::Int.is_temporal());
    assert!(Tag::Tuple.is_composite());
    assert!(Tag::Object.is_composite());
}

#[test]
fn test_tag_display() {
    assert_eq!(Tag::Zero.to_string(), "zero");
    assert_eq!(Tag::String.to_string(), "string");
    assert_eq!(format!("{}", Tag::Duration), "duration");
    assert_eq!(Tag::Object.name(), "object");
}

#[test]
fn test_value_tag_matches_constructor() {
    let cases = [
        (Value::zero(), Tag::Zero),
        (Value::make_null(), Tag::Null),
        (Value::make_phantom(), Tag::Phantom),
        (Value::make_int(1), Tag::Int),
        (Value::make_float(1.0), Tag::Float),
        (Value::make_bool(true), Tag::Bool),
        (Value::make_string("s"), Tag::String),
        (Value::zero_time(), Tag::Time),
        (Value::zero_duration(), Tag::Duration),
        (Value::make_tuple([]), Tag::Tuple),
        (Value::make_object::<&str>([]), Tag::Object),
    ];
    for (value, tag) in cases {
        assert_eq!(value.tag(), tag, "{value:?}");
    }
}
