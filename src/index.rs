use crate::Value;

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T> Sealed for &T where T: ?Sized + Sealed {}
}

/// A position in a Tuple (`usize`) or a key in an Object (`str`, `String`).
///
/// This trait is sealed; it only exists so [`Value::get`] accepts both kinds
/// of index.
pub trait Index: private::Sealed {
    /// Resolves the index against `value`. Looking up a position in an
    /// Object, a key in a Tuple, or anything in a scalar yields `None`.
    #[doc(hidden)]
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value>;
}

impl Index for usize {
    #[inline]
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match value {
            Value::Tuple(items) => items.get(*self),
            _ => None,
        }
    }
}

impl Index for str {
    #[inline]
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match value {
            Value::Object(entries) => entries.get(self),
            _ => None,
        }
    }
}

impl Index for String {
    #[inline]
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.as_str().lookup(value)
    }
}

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    #[inline]
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        (**self).lookup(value)
    }
}
