//! Free-form structured documents stored as JSONB.
//!
//! Plan item constraints, assignment reports, and execution reports carry
//! schema-less payloads. [`Document`] keeps them typed inside the crate while
//! serialising to plain JSON at the edges. Map entries keep their insertion
//! order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Schema-less document value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Document {
    /// Absent value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    String(String),
    /// Ordered list of documents.
    List(Vec<Document>),
    /// Ordered key/value map.
    Map(Vec<(String, Document)>),
}

impl Document {
    /// Builds a map document from ordered entries.
    #[must_use]
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Builds a text document.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Returns `true` for [`Document::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a key in a map document.
    ///
    /// Returns `None` for missing keys and for non-map documents.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns the text of a string document.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value of a numeric document as `i64`, when representable.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, entry)| (key, Self::from(entry)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        match document {
            Document::Null => Self::Null,
            Document::Bool(flag) => Self::Bool(flag),
            Document::Number(number) => Self::Number(number),
            Document::String(text) => Self::String(text),
            Document::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Document::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, entry)| (key, Self::from(entry)))
                    .collect::<Map<String, Self>>(),
            ),
        }
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
