//! Validate-with-defaults: one normalizer for every provider response kind.
//!
//! Each suggestion kind declares a `FieldSpec` table. Provider output is parsed
//! as loose JSON, every element is coerced field by field against that table,
//! and only then deserialized into its typed struct. A malformed element
//! degrades to defaults (or is dropped when its identifying field is missing);
//! it never voids the rest of the batch.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::llm_client::strip_json_fences;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text. Numbers and booleans are stringified.
    Text { default: &'static str },
    /// Integer clamped to `[0, max]`; missing or invalid → 0.
    Score { max: u64 },
    /// Non-negative integer (hours, salary) clamped to `max`; missing or invalid → 0.
    Count { max: u64 },
    /// Decimal clamped to `[0, max]`; missing or invalid → 0.
    Rating { max: f64 },
    /// Closed set of snake_case names; anything else → `default`.
    Enum {
        allowed: &'static [&'static str],
        default: &'static str,
    },
    TextList,
    Object(&'static [FieldSpec]),
    ObjectList(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Only meaningful for `Text`: a blank value drops the whole element.
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Parses raw provider text into typed records, normalizing each element against `fields`.
///
/// Never fails: unparseable text yields an empty list and a warning.
pub fn parse_list<T: DeserializeOwned>(raw: &str, fields: &[FieldSpec], kind: &str) -> Vec<T> {
    let text = strip_json_fences(raw);
    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Discarding {kind} response: not valid JSON ({e}): {:?}",
                text.chars().take(120).collect::<String>()
            );
            return vec![];
        }
    };

    let Value::Array(items) = parsed else {
        warn!("Discarding {kind} response: expected a JSON array");
        return vec![];
    };

    let total = items.len();
    let records: Vec<T> = items
        .iter()
        .filter_map(|item| normalize_object(item, fields))
        .filter_map(|normalized| match serde_json::from_value::<T>(normalized) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping {kind} element that failed typed conversion: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            "Dropped {} of {} {kind} elements missing required fields",
            total - records.len(),
            total
        );
    }
    records
}

/// Normalizes one element. Returns `None` when the value is not an object or a
/// required field is blank.
pub fn normalize_object(value: &Value, fields: &[FieldSpec]) -> Option<Value> {
    let map = value.as_object()?;
    let (normalized, complete) = normalize_fields(Some(map), fields);
    complete.then_some(Value::Object(normalized))
}

fn normalize_fields(map: Option<&Map<String, Value>>, fields: &[FieldSpec]) -> (Map<String, Value>, bool) {
    let mut out = Map::with_capacity(fields.len());
    let mut complete = true;
    for spec in fields {
        let raw = map.and_then(|m| m.get(spec.name)).filter(|v| !v.is_null());
        let value = normalize_field(raw, &spec.kind);
        if spec.required && value.as_str().map_or(true, str::is_empty) {
            complete = false;
        }
        out.insert(spec.name.to_string(), value);
    }
    (out, complete)
}

fn normalize_field(raw: Option<&Value>, kind: &FieldKind) -> Value {
    match *kind {
        FieldKind::Text { default } => Value::String(
            raw.and_then(as_text).unwrap_or_else(|| default.to_string()),
        ),
        FieldKind::Score { max } => {
            let n = raw.and_then(as_number).unwrap_or(0.0);
            Value::from(n.round().clamp(0.0, max as f64) as u64)
        }
        FieldKind::Count { max } => {
            let n = raw.and_then(as_number).unwrap_or(0.0);
            Value::from((n.round().clamp(0.0, max as f64) as u64).min(max))
        }
        FieldKind::Rating { max } => {
            let n = raw.and_then(as_number).unwrap_or(0.0);
            Value::from(n.clamp(0.0, max))
        }
        FieldKind::Enum { allowed, default } => {
            let folded = raw.and_then(Value::as_str).map(fold_enum_name);
            let chosen = folded
                .as_deref()
                .and_then(|f| allowed.iter().find(|a| **a == f))
                .copied()
                .unwrap_or(default);
            Value::String(chosen.to_string())
        }
        FieldKind::TextList => match raw {
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(as_text)
                    .filter(|s| !s.is_empty())
                    .map(Value::String)
                    .collect(),
            ),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                Value::Array(vec![Value::String(s.trim().to_string())])
            }
            _ => Value::Array(vec![]),
        },
        FieldKind::Object(fields) => {
            let (normalized, _) = normalize_fields(raw.and_then(Value::as_object), fields);
            Value::Object(normalized)
        }
        FieldKind::ObjectList(fields) => match raw {
            Some(Value::Array(items)) => Value::Array(
                items
                    .iter()
                    .filter_map(|item| normalize_object(item, fields))
                    .collect(),
            ),
            _ => Value::Array(vec![]),
        },
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings such as `"85"`, `"85%"` or `"$120,000"`.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '$' | '%' | '_') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `"Market Trend"` / `"market-trend"` → `"market_trend"`.
fn fold_enum_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
