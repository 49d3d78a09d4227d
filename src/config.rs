use crate::{Error, Result, error::cold_path};

/// Resource limits applied while walking nested values.
///
/// # Example
///
/// ```
/// use datum::{Error, Limits, ToValue};
///
/// let nested = vec![vec![vec![1_i64]]];
/// let limits = Limits { max_depth: 2 };
///
/// assert!(nested.to_value().is_ok());
/// assert_eq!(
///     nested.to_value_with(&limits),
///     Err(Error::DepthLimitExceeded(2))
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested Tuple/Object levels.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT: Limits = Limits { max_depth: 256 };
}

impl Default for Limits {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Recursion budget threaded through the normalizer, the denormalizer and the
/// serde bridge.
///
/// Each nested container costs one level; going past the limit fails with
/// [`Error::DepthLimitExceeded`] instead of exhausting the stack.
#[derive(Clone, Copy, Debug)]
pub struct Depth {
    current: usize,
    max: usize,
}

impl Depth {
    #[inline]
    pub const fn new(limits: &Limits) -> Self {
        Self {
            current: 0,
            max: limits.max_depth,
        }
    }

    #[inline]
    pub const fn current(self) -> usize {
        self.current
    }

    /// Enters one nesting level.
    #[inline]
    pub fn descend(self) -> Result<Self> {
        if self.current >= self.max {
            cold_path();
            tracing::debug!(max = self.max, "nesting depth limit exceeded");
            return Err(Error::DepthLimitExceeded(self.max));
        }
        Ok(Self {
            current: self.current + 1,
            max: self.max,
        })
    }
}

impl Default for Depth {
    #[inline]
    fn default() -> Self {
        Self::new(&Limits::DEFAULT)
    }
}
