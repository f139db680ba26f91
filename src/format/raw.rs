//! Raw input text and its coercion from loosely typed values.

use std::borrow::Cow;
use std::fmt::Display;

use serde_json::Value;

/// Text as produced upstream (AI answer, history entry, translation result).
/// Absent values coerce to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawText<'a>(Cow<'a, str>);

impl<'a> RawText<'a> {
    /// Coerce any displayable value to its string form.
    pub fn coerce<T: Display + ?Sized>(value: &T) -> RawText<'static> {
        RawText(Cow::Owned(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_owned(self) -> RawText<'static> {
        RawText(Cow::Owned(self.0.into_owned()))
    }
}

impl<'a> From<&'a str> for RawText<'a> {
    fn from(s: &'a str) -> Self {
        RawText(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for RawText<'a> {
    fn from(s: &'a String) -> Self {
        RawText(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for RawText<'static> {
    fn from(s: String) -> Self {
        RawText(Cow::Owned(s))
    }
}

impl<'a, T> From<Option<T>> for RawText<'a>
where
    T: Into<RawText<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<'a> From<&'a Value> for RawText<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(s) => RawText(Cow::Borrowed(s.as_str())),
            other => RawText(Cow::Owned(js_string(other))),
        }
    }
}

/// String form of a JSON value following JavaScript `String(value)`.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Array.prototype.toString: null elements render as empty
        Value::Array(items) => items
            .iter()
            .map(js_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
