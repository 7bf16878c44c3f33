//! Pool connection parameters.
//!
//! Parameters arrive either from a JSON configuration document (already
//! typed) or from `key=value` strings on a command line (always text).
//! Pool clients want native numbers, so text that is purely numeric is
//! normalized before it reaches a [`PoolConnector`](crate::PoolConnector).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean switch.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// Anything else, verbatim.
    Text(String),
}

impl ParamValue {
    /// Coerce numeric-looking text to a number; leave everything else alone.
    ///
    /// Digit-only text (with an optional sign) becomes an integer, falling
    /// back to a float when it does not fit in an `i64`. Text in decimal or
    /// exponent notation becomes a float.
    pub fn normalized(self) -> Self {
        match self {
            Self::Text(text) => coerce_text(text),
            other => other,
        }
    }
}

fn coerce_text(text: String) -> ParamValue {
    let digits = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(&text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = text.parse::<i64>() {
            return ParamValue::Int(value);
        }
        if let Ok(value) = text.parse::<f64>() {
            return ParamValue::Float(value);
        }
    }

    let float_syntax = text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if float_syntax {
        if let Ok(value) = text.parse::<f64>() {
            if value.is_finite() {
                return ParamValue::Float(value);
            }
        }
    }

    ParamValue::Text(text)
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Raw connection parameters, as configured.
///
/// ```
/// use exec0::{ParamValue, PoolParams};
///
/// let params = PoolParams::parse_pairs(["n_workers=8", "scheduler=tcp://head:8786"]).unwrap();
/// let normalized = params.normalize();
/// assert_eq!(normalized.get("n_workers"), Some(&ParamValue::Int(8)));
/// assert_eq!(normalized.text("scheduler").as_deref(), Some("tcp://head:8786"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolParams(BTreeMap<String, ParamValue>);

impl PoolParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Parse `key=value` strings; later keys replace earlier ones.
    ///
    /// Only the first `=` separates key from value, so values may contain
    /// `=` themselves.
    pub fn parse_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPair(pair.to_owned()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::MalformedPair(pair.to_owned()));
            }
            params.insert(key, value);
        }
        Ok(params)
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coerce every numeric-looking text value to its native type.
    pub fn normalize(&self) -> NormalizedParams {
        NormalizedParams(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.clone().normalized()))
                .collect(),
        )
    }
}

/// Parameters after numeric normalization, with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedParams(BTreeMap<String, ParamValue>);

impl NormalizedParams {
    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read an integer parameter.
    ///
    /// Whole floats are accepted. Anything non-numeric is a
    /// [`ConfigError::NotNumeric`].
    pub fn int(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ParamValue::Int(v)) => Ok(Some(*v)),
            Some(ParamValue::Float(v)) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Ok(Some(*v as i64))
            }
            Some(other) => Err(not_numeric(key, other)),
        }
    }

    /// Read a floating-point parameter. Integers are widened.
    pub fn float(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ParamValue::Int(v)) => Ok(Some(*v as f64)),
            Some(ParamValue::Float(v)) => Ok(Some(*v)),
            Some(other) => Err(not_numeric(key, other)),
        }
    }

    /// Read a boolean parameter.
    ///
    /// Accepts booleans, `0`/`1`, and `true`/`false`/`yes`/`no` in any case.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        let parsed = match self.0.get(key) {
            None => return Ok(None),
            Some(ParamValue::Bool(v)) => Some(*v),
            Some(ParamValue::Int(0)) => Some(false),
            Some(ParamValue::Int(1)) => Some(true),
            Some(ParamValue::Text(t)) => match t.to_ascii_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            },
            Some(_) => None,
        };
        match parsed {
            Some(v) => Ok(Some(v)),
            None => Err(ConfigError::OutOfRange {
                key: key.to_owned(),
                message: format!("expected a boolean, got {}", self.0[key]),
            }),
        }
    }

    /// Read any parameter rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(ToString::to_string)
    }
}

fn not_numeric(key: &str, value: &ParamValue) -> ConfigError {
    ConfigError::NotNumeric {
        key: key.to_owned(),
        value: value.to_string(),
    }
}
