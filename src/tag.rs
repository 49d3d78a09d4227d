use std::fmt;

use crate::Error;

/// The closed set of value kinds.
///
/// The discriminant order is fixed: it is the order in which the kinds are
/// listed in the wire schema, and `Zero` is always `0`.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Tag {
    Zero = 0,
    Null = 1,
    Phantom = 2,
    Int = 3,
    Float = 4,
    Bool = 5,
    String = 6,
    Time = 7,
    Duration = 8,
    Tuple = 9,
    Object = 10,
}

impl Tag {
    /// All tags in discriminant order.
    pub const ALL: [Tag; 11] = [
        Tag::Zero,
        Tag::Null,
        Tag::Phantom,
        Tag::Int,
        Tag::Float,
        Tag::Bool,
        Tag::String,
        Tag::Time,
        Tag::Duration,
        Tag::Tuple,
        Tag::Object,
    ];

    /// Returns the tag for a raw discriminant, or `None` if it lies outside
    /// the closed set.
    ///
    /// # Example
    ///
    /// ```
    /// use datum::Tag;
    ///
    /// assert_eq!(Tag::from_u8(3), Some(Tag::Int));
    /// assert_eq!(Tag::from_u8(11), None);
    /// ```
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ALL.len() {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    /// Returns `true` for kinds that carry no payload: Zero, Null, Phantom.
    pub const fn is_unit(self) -> bool {
        matches!(self, Self::Zero | Self::Null | Self::Phantom)
    }

    /// Returns `true` for the single-value kinds: Int, Float, Bool, String,
    /// Time, Duration.
    ///
    /// # Example
    ///
    /// ```
    /// use datum::Tag;
    ///
    /// assert!(Tag::Int.is_scalar());
    /// assert!(Tag::Time.is_scalar());
    /// assert!(!Tag::Null.is_scalar());
    /// assert!(!Tag::Tuple.is_scalar());
    /// ```
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Bool | Self::String | Self::Time | Self::Duration
        )
    }

    /// Returns `true` for Time and Duration, whose payload is the canonical
    /// temporal encoding.
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Time | Self::Duration)
    }

    /// Returns `true` for kinds that contain other values: Tuple, Object.
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Tuple | Self::Object)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Null => "null",
            Self::Phantom => "phantom",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Tuple => "tuple",
            Self::Object => "object",
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tag::from_u8(value).ok_or(Error::InvalidTag(value))
    }
}

impl From<Tag> for u8 {
    #[inline]
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
