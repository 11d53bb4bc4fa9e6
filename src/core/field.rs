//! Field value types, conversion and comparison

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A polymorphic field value resolved from a record at a column path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Convert a JSON value into a field value
    ///
    /// Strings are kept verbatim, including date-like ones, so search and
    /// display see the text the record holds. Arrays collapse to the
    /// comma-joined text of their members. Objects carry no scalar meaning and
    /// become `Null`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    n.as_f64().map_or(FieldValue::Null, FieldValue::Float)
                }
            }
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(items) => FieldValue::String(
                items
                    .iter()
                    .map(|item| FieldValue::from_json(item).to_text())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    ///
    /// Strings holding an RFC 3339 timestamp or a `YYYY-MM-DD` date (UTC
    /// midnight) are parsed.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::String(s) => parse_date(s),
            _ => None,
        }
    }

    /// Form used as a sort key: date-like strings become their instant
    ///
    /// Parsing once per row keeps [`compare_values`] from reparsing on every
    /// comparison.
    pub fn into_sort_key(self) -> Self {
        match self.as_datetime() {
            Some(dt) => FieldValue::DateTime(dt),
            None => self,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Plain text form used by search, filters and default cell content
    ///
    /// Strings are returned as stored. Only typed timestamps are formatted.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
            FieldValue::Null => String::new(),
        }
    }

    /// Case-insensitive substring match used by search and column filters
    ///
    /// `needle` must already be lower-cased. Null never matches.
    pub fn contains_ci(&self, needle: &str) -> bool {
        if self.is_null() {
            return false;
        }
        self.to_text().to_lowercase().contains(needle)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    // Cheap reject before handing every string to chrono
    let bytes = s.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Type-aware comparison of two resolved values
///
/// Missing values (absent or `Null`) order after every defined value, and two
/// missing values are equal. Timestamps compare by instant, numbers
/// numerically, everything else by its text: case-insensitively first, then
/// by raw text so the order stays total.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (a.as_datetime(), b.as_datetime()) {
                return x.cmp(&y);
            }
            if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
                return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            }
            compare_text(&a.to_text(), &b.to_text())
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
