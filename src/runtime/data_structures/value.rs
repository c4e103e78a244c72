use std::fmt::{self, Display, Formatter};

use crate::runtime::error::{self, Fault, ScriptError};

/// The value type of the language.  Everything that can sit on the operand stack or in a
/// variable is one of these.
///
/// The language is loosely typed, so the coercion methods are total wherever they sensibly can
/// be.  Only a string that fails to parse as a number raises a fault.
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Coerce the value to a number.  Booleans coerce to 1 and 0, and strings are parsed.
    pub fn as_number(&self) -> error::Result<f64> {
        match self {
            Value::Number(value) => Ok(*value),
            Value::Bool(true) => Ok(1.0),
            Value::Bool(false) => Ok(0.0),

            Value::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => Ok(value),
                Err(_) => Err(ScriptError::Runtime(Fault::NotANumber(text.clone()))),
            },
        }
    }

    /// Coerce the value to an integer, truncating towards zero.
    pub fn as_int(&self) -> error::Result<i64> {
        Ok(self.as_number()? as i64)
    }

    /// Coerce the value to its textual form.
    pub fn as_text(&self) -> String {
        format!("{}", self)
    }

    /// The truthiness used by the conditional operations.  Zero, false, and the empty string
    /// are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::Bool(value) => *value,
            Value::Text(text) => !text.is_empty(),
        }
    }
}

/// Values of the same kind compare directly.  Numbers and booleans compare through the numeric
/// coercion, so `1 true =` holds.  Everything else is unequal.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,

            (Value::Number(number), Value::Bool(flag))
            | (Value::Bool(flag), Value::Number(number)) => {
                *number == if *flag { 1.0 } else { 0.0 }
            }

            _ => false,
        }
    }
}

/// Numbers print in integer form when they hold a whole value.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }

            Value::Text(text) => write!(f, "{}", text),
            Value::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Text(value.to_string())
    }
}
