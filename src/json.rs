//! Tolerant field access on ClickUp responses.
//!
//! Responses are kept as [`serde_json::Value`] and read through these
//! helpers. A missing key, a `null`, or a value of the wrong shape all
//! produce a neutral default instead of an error.

use serde_json::Value;

static EMPTY: Vec<Value> = Vec::new();

/// Optional-field extraction on JSON documents.
pub trait JsonExt {
    /// Look up a nested field. `null` counts as absent.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    /// The field as a string, or `""`. Numbers and booleans are stringified.
    fn str_at(&self, path: &[&str]) -> String {
        self.opt_str_at(path).unwrap_or_default()
    }

    /// The field as a string, if present and scalar.
    fn opt_str_at(&self, path: &[&str]) -> Option<String> {
        match self.at(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The field as an integer. Numeric strings are accepted.
    #[allow(clippy::cast_possible_truncation)] // fractional millis are dropped on purpose
    fn i64_at(&self, path: &[&str]) -> Option<i64> {
        match self.at(path)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The field as a boolean, `false` when absent.
    fn bool_at(&self, path: &[&str]) -> bool {
        self.at(path).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The field as an array, or an empty slice.
    fn array_at(&self, path: &[&str]) -> &[Value] {
        self.at(path).and_then(Value::as_array).map_or(EMPTY.as_slice(), Vec::as_slice)
    }

    /// A clone of the field, or `null`.
    fn value_at(&self, path: &[&str]) -> Value {
        self.at(path).cloned().unwrap_or(Value::Null)
    }
}

impl JsonExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for key in path {
            current = current.get(key)?;
        }
        (!current.is_null()).then_some(current)
    }
}

/// Pretty-print a projection for an agent.
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
