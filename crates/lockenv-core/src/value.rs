//! Typed values stored in an environment and the coercion rules that
//! deferred defaults apply to incoming values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EnvError, Result};

/// A concrete configuration value.
///
/// Deserializes untagged so that TOML/JSON scalars and arrays map directly
/// onto variants; floats, datetimes and tables are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Declared type of a deferred value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Bool,
    Int,
    Str,
    List(Box<TargetType>),
}

impl TargetType {
    pub fn list_of(elem: TargetType) -> Self {
        Self::List(Box::new(elem))
    }

    /// Coerce `value` to this type.
    ///
    /// Strings are parsed for `Bool` (`true/false/yes/no/on/off/1/0`, any
    /// case) and `Int`; integers 0 and 1 are accepted as booleans. A scalar
    /// coerced to a list becomes a one-element list.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        match (self, value) {
            (Self::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Self::Bool, Value::Int(0)) => Ok(Value::Bool(false)),
            (Self::Bool, Value::Int(1)) => Ok(Value::Bool(true)),
            (Self::Bool, Value::Str(s)) => match parse_bool(&s) {
                Some(b) => Ok(Value::Bool(b)),
                None => Err(self.mismatch(&Value::Str(s))),
            },
            (Self::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (Self::Int, Value::Str(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(Value::Int(i)),
                Err(_) => Err(self.mismatch(&Value::Str(s))),
            },
            (Self::Str, Value::Str(s)) => Ok(Value::Str(s)),
            (Self::List(elem), Value::List(items)) => items
                .into_iter()
                .map(|item| elem.coerce(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            (Self::List(elem), scalar) => elem.coerce(scalar).map(|v| Value::List(vec![v])),
            (_, other) => Err(self.mismatch(&other)),
        }
    }

    fn mismatch(&self, found: &Value) -> EnvError {
        EnvError::TypeCoercion {
            expected: self.clone(),
            found: found.to_string(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Str => write!(f, "str"),
            Self::List(elem) => write!(f, "list<{elem}>"),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
