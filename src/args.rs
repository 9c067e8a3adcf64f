//! Tool argument extraction.
//!
//! Agents are loose about types: a list may arrive as `"a, b"` or as
//! `["a", "b"]`, a number as `3` or `"3"`, a flag as `true` or `"true"`.
//! [`ToolArgs`] accepts all of these. Absent keys, `null`, and empty strings
//! are all treated as "not provided".

use crate::error::{Error, Result};
use crate::ids::split_list;
use serde_json::{Map, Value};

/// The argument bag passed to a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Wrap an argument object.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build from any JSON value; non-objects yield an empty bag.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    /// Parse a JSON object from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }

    fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Whether the key was supplied at all (even as an empty string).
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// A string argument; empty strings count as absent.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<String> {
        let text = match self.raw(key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// A string argument that must be present.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming `key` when it is missing.
    pub fn require(&self, key: &str) -> Result<String> {
        self.str(key).ok_or_else(|| Error::required(key))
    }

    /// A list argument from a comma-separated string or an array.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.raw(key)? {
            Value::String(s) => Some(split_list(s)),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// An integer argument from a number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the value is present but not an integer.
    pub fn int(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.raw(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| Error::validation(format!("{key} must be an integer.")))
    }

    /// A boolean argument; `None` when absent.
    #[must_use]
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.raw(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether a boolean flag is set to true.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.bool(key).unwrap_or(false)
    }

    /// A list of integer IDs (e.g. user IDs).
    ///
    /// # Errors
    ///
    /// Returns a validation error if any item is not an integer.
    pub fn int_list(&self, key: &str) -> Result<Option<Vec<i64>>> {
        let Some(items) = self.list(key) else {
            return Ok(None);
        };
        items
            .iter()
            .map(|item| {
                item.parse::<i64>().map_err(|_| {
                    Error::validation(format!("{key} must contain numeric user IDs, got '{item}'."))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

impl From<Map<String, Value>> for ToolArgs {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        ToolArgs::from_value(value)
    }

    #[test]
    fn test_str_treats_empty_and_null_as_absent() {
        let a = args(json!({"a": "x", "b": "", "c": null, "d": 5}));
        assert_eq!(a.str("a").as_deref(), Some("x"));
        assert_eq!(a.str("b"), None);
        assert_eq!(a.str("c"), None);
        assert_eq!(a.str("d").as_deref(), Some("5"));
        assert_eq!(a.str("missing"), None);
        assert!(a.has("b"));
        assert!(!a.has("c"));
    }

    #[test]
    fn test_require_message() {
        let err = args(json!({})).require("listId").unwrap_err();
        assert_eq!(err.to_string(), "listId is required.");
    }

    #[test]
    fn test_list_from_string_or_array() {
        let a = args(json!({"s": "a, b,,c", "arr": ["x", " y ", 3, ""], "n": 7}));
        assert_eq!(a.list("s").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(a.list("arr").unwrap(), vec!["x", "y", "3"]);
        assert_eq!(a.list("n"), None);
    }

    #[test]
    fn test_int_parsing() {
        let a = args(json!({"n": 3, "s": " 4 ", "bad": "x", "empty": ""}));
        assert_eq!(a.int("n").unwrap(), Some(3));
        assert_eq!(a.int("s").unwrap(), Some(4));
        assert_eq!(a.int("empty").unwrap(), None);
        assert_eq!(a.int("missing").unwrap(), None);
        assert_eq!(a.int("bad").unwrap_err().to_string(), "bad must be an integer.");
    }

    #[test]
    fn test_bool_parsing() {
        let a = args(json!({"t": true, "s": "true", "one": 1, "zero": "0", "junk": "maybe"}));
        assert_eq!(a.bool("t"), Some(true));
        assert_eq!(a.bool("s"), Some(true));
        assert_eq!(a.bool("one"), Some(true));
        assert_eq!(a.bool("zero"), Some(false));
        assert_eq!(a.bool("junk"), None);
        assert!(!a.flag("missing"));
    }

    #[test]
    fn test_int_list() {
        let a = args(json!({"ids": "1, 2", "bad": "1, ana"}));
        assert_eq!(a.int_list("ids").unwrap(), Some(vec![1, 2]));
        assert!(a.int_list("bad").is_err());
        assert_eq!(a.int_list("missing").unwrap(), None);
    }

    #[test]
    fn test_parse_non_object() {
        assert_eq!(ToolArgs::parse("[1,2]").unwrap(), ToolArgs::default());
        assert!(ToolArgs::parse("{").is_err());
    }
}
