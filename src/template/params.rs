//! Declared parameter types and typed parameter values

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::error::ResourceError;

/// Returned when a type name in a declaration is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter type '{0}' (expected string, integer, float or boolean)")]
pub struct UnknownParameterType(pub String);

/// The semantic type a template declares for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum ParameterType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Float => "float",
            ParameterType::Boolean => "boolean",
        }
    }

    /// Convert a raw extracted string into a value of this type
    ///
    /// Booleans accept exactly `true` and `false`.
    pub fn coerce(&self, name: &str, raw: &str) -> Result<ParameterValue, ResourceError> {
        let value = match self {
            ParameterType::String => Some(ParameterValue::String(raw.to_string())),
            ParameterType::Integer => raw.parse().ok().map(ParameterValue::Integer),
            ParameterType::Float => raw.parse().ok().map(ParameterValue::Float),
            ParameterType::Boolean => match raw {
                "true" => Some(ParameterValue::Boolean(true)),
                "false" => Some(ParameterValue::Boolean(false)),
                _ => None,
            },
        };

        value.ok_or_else(|| {
            ResourceError::parameter_extraction(
                format!("parameter '{}' value '{}' is not a valid {}", name, raw, self),
                vec![name.to_string()],
            )
        })
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = UnknownParameterType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ParameterType::String),
            "integer" | "int" => Ok(ParameterType::Integer),
            "float" => Ok(ParameterType::Float),
            "boolean" | "bool" => Ok(ParameterType::Boolean),
            _ => Err(UnknownParameterType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ParameterType {
    type Error = UnknownParameterType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A parameter value tagged with its type
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ParameterValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::String(_) => ParameterType::String,
            ParameterValue::Integer(_) => ParameterType::Integer,
            ParameterValue::Float(_) => ParameterType::Float,
            ParameterValue::Boolean(_) => ParameterType::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(s) => f.write_str(s),
            ParameterValue::Integer(n) => write!(f, "{}", n),
            ParameterValue::Float(n) => write!(f, "{}", n),
            ParameterValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}
