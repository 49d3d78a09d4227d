use std::fmt;

use crate::{Value, temporal};

/// Rendering of the [`Value::Zero`] sentinel.
pub const ZERO_LITERAL: &str = "<zeroValue>";
/// Rendering of [`Value::Null`].
pub const NULL_LITERAL: &str = "<null>";
/// Rendering of [`Value::Phantom`].
pub const PHANTOM_LITERAL: &str = "<phantom>";

enum Token<'a> {
    Value(&'a Value),
    Key(&'a str),
    Text(&'static str),
}

impl Value {
    /// Renders the value for humans: logs, CLIs, error messages.
    ///
    /// The output is deterministic (object keys are sorted) but it is not a
    /// wire format and is not meant to be parsed back. Strings are quoted
    /// with `'` and are not escaped.
    ///
    /// # Example
    ///
    /// ```
    /// use datum::Value;
    ///
    /// assert_eq!(Value::make_int(42).show(), "42");
    /// assert_eq!(Value::make_string("hi").show(), "'hi'");
    /// assert_eq!(Value::make_bool(true).show(), "true");
    /// assert_eq!(Value::make_null().show(), "<null>");
    /// ```
    #[inline]
    pub fn show(&self) -> String {
        self.to_string()
    }
}

// Iterative: containers push their pieces onto an explicit stack, in reverse.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Token::Value(self)];
        while let Some(token) = stack.pop() {
            match token {
                Token::Text(text) => f.write_str(text)?,
                Token::Key(key) => {
                    f.write_str(key)?;
                    f.write_str(": ")?;
                }
                Token::Value(value) => write_value(f, value, &mut stack)?,
            }
        }
        Ok(())
    }
}

fn write_value<'a>(
    f: &mut fmt::Formatter<'_>,
    value: &'a Value,
    stack: &mut Vec<Token<'a>>,
) -> fmt::Result {
    match value {
        Value::Zero => f.write_str(ZERO_LITERAL),
        Value::Null => f.write_str(NULL_LITERAL),
        Value::Phantom => f.write_str(PHANTOM_LITERAL),
        Value::Int(v) => write!(f, "{v}"),
        Value::Float(v) => write!(f, "{v}"),
        Value::Bool(v) => write!(f, "{v}"),
        Value::String(v) => write!(f, "'{}'", v.decode()),
        Value::Time(v) => match v.to_datetime() {
            Ok(datetime) => temporal::write_datetime(f, &datetime),
            Err(error) => {
                tracing::warn!(%error, "rendering undecodable time payload");
                write!(f, "<invalid time {}s {}ns>", v.seconds, v.nanos)
            }
        },
        Value::Duration(v) => match v.validate() {
            Ok(()) => temporal::write_duration(f, v),
            Err(error) => {
                tracing::warn!(%error, "rendering undecodable duration payload");
                write!(f, "<invalid duration {}s {}ns>", v.seconds, v.nanos)
            }
        },
        Value::Tuple(v) => {
            stack.push(Token::Text(")"));
            for (i, item) in v.iter().enumerate().rev() {
                stack.push(Token::Value(item));
                if i > 0 {
                    stack.push(Token::Text(", "));
                }
            }
            f.write_str("(")
        }
        Value::Object(v) => {
            stack.push(Token::Text("}"));
            for (i, (key, item)) in v.iter().enumerate().rev() {
                stack.push(Token::Value(item));
                stack.push(Token::Key(key));
                if i > 0 {
                    stack.push(Token::Text(", "));
                }
            }
            f.write_str("{")
        }
    }
}
