//! Override record and request payload models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::dates_between;

/// Schedule exception stored for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub closed: bool,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub detail: String,
}

impl OverrideRecord {
    /// A record for a fully closed day. Times are always cleared.
    pub fn closed(detail: impl Into<String>) -> Self {
        Self {
            closed: true,
            start: None,
            end: None,
            detail: detail.into(),
        }
    }

    /// A record with special opening hours.
    pub fn open(start: Option<String>, end: Option<String>, detail: impl Into<String>) -> Self {
        Self {
            closed: false,
            start,
            end,
            detail: detail.into(),
        }
    }
}

/// Upsert request body.
///
/// Fields are loosely typed: clients send whatever their form produced, and
/// each field is interpreted loosely: `null`, `false`, `0` and `""` count as
/// unset.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertRequest {
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub dates: Value,
    #[serde(default)]
    pub from: Value,
    #[serde(default)]
    pub to: Value,
    #[serde(default)]
    pub closed: Value,
    #[serde(default)]
    pub start: Value,
    #[serde(default)]
    pub end: Value,
    #[serde(default)]
    pub detail: Value,
}

impl UpsertRequest {
    /// Parse a request body, treating anything but a JSON object as `{}`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            Ok(_) => Self::default(),
            Err(e) => {
                tracing::debug!("Treating malformed upsert body as empty: {}", e);
                Self::default()
            }
        }
    }

    /// Target dates: `date`, then `dates`, then the `from`..`to` range.
    ///
    /// Duplicates are kept.
    pub fn target_dates(&self) -> Vec<String> {
        let mut targets = Vec::new();

        if let Some(date) = non_empty_str(&self.date) {
            targets.push(date.to_string());
        }

        if let Value::Array(items) = &self.dates {
            targets.extend(items.iter().filter_map(non_empty_str).map(String::from));
        }

        if let (Some(from), Some(to)) = (non_empty_str(&self.from), non_empty_str(&self.to)) {
            targets.extend(dates_between(from, to));
        }

        targets
    }

    /// Normalize the payload fields into the record written to every target.
    pub fn record(&self) -> OverrideRecord {
        let detail = non_empty_str(&self.detail).unwrap_or_default();

        if is_truthy(&self.closed) {
            OverrideRecord::closed(detail)
        } else {
            OverrideRecord::open(
                non_empty_str(&self.start).map(String::from),
                non_empty_str(&self.end).map(String::from),
                detail,
            )
        }
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Decode a stored blob into the JSON value reported to clients.
///
/// Empty or absent blobs become `null`; text that is not JSON is returned
/// as a JSON string rather than failing the read.
pub fn decode_stored(raw: Option<&str>) -> Value {
    match raw {
        None | Some("") => Value::Null,
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
    }
}
