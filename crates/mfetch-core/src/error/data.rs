//! Positional diagnostic values attached to an error.

use serde::Serialize;
use std::fmt;

use super::Error;

/// One entry of [`Error::data`]. Only used for diagnostics; callers branch
/// on category and code, never on these values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorData {
    Text(String),
    Integer(i64),
    Float(f64),
    Error(Box<Error>),
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorData::Text(s) => f.write_str(s),
            ErrorData::Integer(n) => write!(f, "{}", n),
            ErrorData::Float(x) => write!(f, "{}", x),
            ErrorData::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for ErrorData {
    fn from(s: &str) -> Self {
        ErrorData::Text(s.to_string())
    }
}

impl From<&String> for ErrorData {
    fn from(s: &String) -> Self {
        ErrorData::Text(s.clone())
    }
}

impl From<i64> for ErrorData {
    fn from(n: i64) -> Self {
        ErrorData::Integer(n)
    }
}

impl From<u16> for ErrorData {
    fn from(n: u16) -> Self {
        ErrorData::Integer(i64::from(n))
    }
}

impl From<f64> for ErrorData {
    fn from(x: f64) -> Self {
        ErrorData::Float(x)
    }
}
