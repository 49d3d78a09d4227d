//! A self-describing value model.
//!
//! [`Value`] is a closed tagged union of scalars (Int, Float, Bool, String),
//! temporal values (Time, Duration), composites (Tuple, Object) and three
//! unit kinds (Zero, Null, Phantom). Native Rust data enters the model through
//! [`ToValue`], [`Value::from_any`] or the serde bridge ([`to_value`]) and
//! leaves it through the accessors, [`Value::to_raw_value`] or
//! [`from_value`]. [`Value::show`] renders any value for humans.
//!
//! ```
//! use datum::{ToValue, Value};
//!
//! let value = vec![1_i32, 2].to_value().unwrap();
//! assert_eq!(value, Value::make_tuple([Value::make_int(1), Value::make_int(2)]));
//! assert_eq!(value.show(), "(1, 2)");
//! ```

mod config;
#[cfg(feature = "serde")]
pub mod de;
mod dynamic;
mod error;
mod index;
mod normalize;
mod raw;
#[cfg(feature = "serde")]
pub mod ser;
mod tag;
pub mod temporal;
mod value;
#[cfg(feature = "serde")]
mod with;

pub use config::*;
#[cfg(feature = "serde")]
pub use de::{from_value, from_value_with};
pub use dynamic::*;
pub use error::*;
pub use index::*;
pub use normalize::*;
pub use raw::*;
#[cfg(feature = "serde")]
pub use ser::{to_value, to_value_with};
pub use tag::*;
pub use temporal::{Duration, Timestamp};
pub use value::*;
#[cfg(feature = "serde")]
pub use with::{duration, time};
