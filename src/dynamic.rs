use std::any::{Any, type_name};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::{
    Depth, Duration, Error, Limits, Object, Phantom, RawValue, Result, Str, Timestamp, ToValue,
    Tuple, Value, error::cold_path,
};

/// A heterogeneous sequence for [`Value::from_any`].
pub type AnySeq = Vec<Box<dyn Any>>;
/// A heterogeneous string-keyed map for [`Value::from_any`].
pub type AnyMap = HashMap<String, Box<dyn Any>>;

impl Value {
    /// Normalizes a value whose concrete type is only known at runtime.
    ///
    /// Recognizes every scalar type [`ToValue`] covers, [`Value`],
    /// [`RawValue`], and the dynamic containers [`AnySeq`], [`AnyMap`] and
    /// `Option<Box<dyn Any>>`, whose elements are inspected recursively.
    /// Prefer [`ToValue`] whenever the type is known statically.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedNativeType`] naming the offending type if it is
    /// none of the above. This is a caller bug, not bad data.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    /// use datum::{AnySeq, Error, Value};
    ///
    /// let row: AnySeq = vec![Box::new(1_i32), Box::new("a"), Box::new(None::<Box<dyn Any>>)];
    /// assert_eq!(
    ///     Value::from_any(&row).unwrap().show(),
    ///     "(1, 'a', <null>)"
    /// );
    ///
    /// let callback = |x: i32| x + 1;
    /// assert!(matches!(
    ///     Value::from_any(&callback),
    ///     Err(Error::UnsupportedNativeType(_))
    /// ));
    /// ```
    pub fn from_any<T: Any>(value: &T) -> Result<Value> {
        from_dyn(value, Some(type_name::<T>()), &Path::Root, Depth::default())
    }

    pub fn from_any_with<T: Any>(value: &T, limits: &Limits) -> Result<Value> {
        from_dyn(value, Some(type_name::<T>()), &Path::Root, Depth::new(limits))
    }
}

// Where an element sits inside the dynamic containers, innermost first when
// rendered: ` at element 1 of AnySeq, key 'row' of AnyMap`.
#[derive(Clone, Copy)]
enum Path<'a> {
    Root,
    Element(usize, &'a Path<'a>),
    Key(&'a str, &'static str, &'a Path<'a>),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = self;
        let mut sep = " at ";
        loop {
            path = match path {
                Path::Root => return Ok(()),
                Path::Element(index, parent) => {
                    write!(f, "{sep}element {index} of AnySeq")?;
                    *parent
                }
                Path::Key(key, container, parent) => {
                    write!(f, "{sep}key '{key}' of {container}")?;
                    *parent
                }
            };
            sep = ", ";
        }
    }
}

fn from_dyn(
    value: &dyn Any,
    name: Option<&'static str>,
    path: &Path<'_>,
    depth: Depth,
) -> Result<Value> {
    macro_rules! downcast {
        ($($t:ty),* $(,)?) => {
            $(
                if let Some(v) = value.downcast_ref::<$t>() {
                    return v.to_value_at(depth);
                }
            )*
        };
    }

    downcast!(
        bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char,
        &'static str, String, Cow<'static, str>, Str, Bytes,
        DateTime<Utc>, DateTime<FixedOffset>, SystemTime, TimeDelta, std::time::Duration,
        (), Phantom, Value, RawValue, Tuple, Object, Timestamp, Duration,
    );
    #[cfg(feature = "i128")]
    downcast!(i128, u128);

    if let Some(items) = value.downcast_ref::<AnySeq>() {
        let depth = depth.descend()?;
        return items
            .iter()
            .enumerate()
            .map(|(index, item)| from_dyn(&**item, None, &Path::Element(index, path), depth))
            .collect::<Result<Tuple>>()
            .map(Value::Tuple);
    }
    if let Some(entries) = value.downcast_ref::<AnyMap>() {
        return object_from_dyn(entries, "AnyMap", path, depth);
    }
    if let Some(entries) = value.downcast_ref::<BTreeMap<String, Box<dyn Any>>>() {
        return object_from_dyn(entries, "BTreeMap<String, Box<dyn Any>>", path, depth);
    }
    if let Some(inner) = value.downcast_ref::<Option<Box<dyn Any>>>() {
        return match inner {
            Some(inner) => from_dyn(&**inner, None, path, depth),
            None => Ok(Value::Null),
        };
    }
    if let Some(inner) = value.downcast_ref::<Box<dyn Any>>() {
        return from_dyn(&**inner, None, path, depth);
    }

    cold_path();
    let name = match name {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("dyn Any{path}")),
    };
    tracing::debug!(native_type = %name, "rejecting unsupported native type");
    Err(Error::UnsupportedNativeType(name))
}

fn object_from_dyn<'a, I>(
    entries: I,
    container: &'static str,
    path: &Path<'_>,
    depth: Depth,
) -> Result<Value>
where
    I: IntoIterator<Item = (&'a String, &'a Box<dyn Any>)>,
{
    let depth = depth.descend()?;
    entries
        .into_iter()
        .map(|(key, item)| {
            let path = Path::Key(key, container, path);
            Ok::<_, Error>((key.as_str(), from_dyn(&**item, None, &path, depth)?))
        })
        .collect::<Result<Object>>()
        .map(Value::Object)
}
