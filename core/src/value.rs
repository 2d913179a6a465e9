//! Resolved parameter values.
//!
//! Every parameter bound by the resolver ends up as a [`Value`]. Defaults and
//! override values are written in configurations as [`Literal`]s and only
//! become values once they pass through the
//! [`TypeRegistry`](crate::TypeRegistry).

use std::fmt;

use serde::Serialize;

/// A default or override value as written in a configuration.
///
/// `null` means "no default".
pub type Literal = serde_json::Value;

/// A coerced parameter value.
///
/// # Examples
///
/// ```
/// use elegant_cli_core::Value;
///
/// let value = Value::Int(5);
/// assert_eq!(value.as_int(), Some(5));
/// assert_eq!(value.kind_name(), "int");
/// assert!(value.as_str().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean switch.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Plain string.
    Str(String),
    /// Sequence of string items from a `list` parameter.
    List(Vec<String>),
    /// Structured value produced by a caller-registered coercion.
    Custom(serde_json::Value),
}

impl Value {
    /// Returns the name of this variant, as used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Custom(_) => "custom",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Custom(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Custom(v) => write!(f, "{v}"),
        }
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
