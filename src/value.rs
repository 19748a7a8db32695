//! Value Model for Binding Expressions
//!
//! `ParsedValue` is what a binding expression resolves to. Mappings keep their
//! keys sorted so that two scans of the same markup compare equal and render
//! identically in diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Additional values of a binding, keyed by name.
pub type ValueMap = BTreeMap<String, ParsedValue>;

// ═══════════════════════════════════════════════════════════════════════════════
// NUMBERS
// ═══════════════════════════════════════════════════════════════════════════════

/// A numeric literal. Integer and floating forms stay distinct but compare
/// numerically, so `Int(1) == Float(1.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(i) => Some(i),
            Number::Float(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Keep a trailing `.0` so the float form survives a round trip
            Number::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSED VALUE
// ═══════════════════════════════════════════════════════════════════════════════

/// A decoded binding expression.
///
/// `List` and `Null` only appear nested inside object literals or when the
/// general decoder is handed an explicit `[...]` literal; the top-level prefix
/// rules never produce `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    List(Vec<ParsedValue>),
    Mapping(ValueMap),
}

impl ParsedValue {
    /// The empty mapping substituted for malformed expressions.
    pub fn empty_mapping() -> Self {
        ParsedValue::Mapping(ValueMap::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParsedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParsedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParsedValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParsedValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ValueMap> {
        match self {
            ParsedValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParsedValue]> {
        match self {
            ParsedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParsedValue::Null)
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Variant name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedValue::Null => "null",
            ParsedValue::Boolean(_) => "boolean",
            ParsedValue::Number(_) => "number",
            ParsedValue::String(_) => "string",
            ParsedValue::List(_) => "list",
            ParsedValue::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Null => write!(f, "null"),
            ParsedValue::Boolean(b) => write!(f, "{}", b),
            ParsedValue::Number(n) => write!(f, "{}", n),
            ParsedValue::String(s) => {
                write!(f, "{}", serde_json::Value::String(s.clone()))
            }
            ParsedValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ParsedValue::Mapping(map) => {
                if map.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════════

impl From<&str> for ParsedValue {
    fn from(s: &str) -> Self {
        ParsedValue::String(s.to_string())
    }
}

impl From<String> for ParsedValue {
    fn from(s: String) -> Self {
        ParsedValue::String(s)
    }
}

impl From<bool> for ParsedValue {
    fn from(b: bool) -> Self {
        ParsedValue::Boolean(b)
    }
}

impl From<i64> for ParsedValue {
    fn from(i: i64) -> Self {
        ParsedValue::Number(Number::Int(i))
    }
}

impl From<f64> for ParsedValue {
    fn from(f: f64) -> Self {
        ParsedValue::Number(Number::Float(f))
    }
}

impl From<ValueMap> for ParsedValue {
    fn from(map: ValueMap) -> Self {
        ParsedValue::Mapping(map)
    }
}

impl From<ParsedValue> for serde_json::Value {
    fn from(value: ParsedValue) -> Self {
        match value {
            ParsedValue::Null => serde_json::Value::Null,
            ParsedValue::Boolean(b) => serde_json::Value::Bool(b),
            ParsedValue::Number(Number::Int(i)) => serde_json::Value::from(i),
            ParsedValue::Number(Number::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ParsedValue::String(s) => serde_json::Value::String(s),
            ParsedValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            ParsedValue::Mapping(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for ParsedValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParsedValue::Null,
            serde_json::Value::Bool(b) => ParsedValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ParsedValue::Number(Number::Int(i)),
                None => ParsedValue::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => ParsedValue::String(s),
            serde_json::Value::Array(items) => {
                ParsedValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                ParsedValue::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
