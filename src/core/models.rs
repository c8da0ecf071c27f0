//! Request value shapes: input strings, phrase expansion, file format tags

use serde_json::{json, Map, Value};
use std::fmt;

use crate::core::errors::{ClientError, Result};

/// File formats the remote service understands for import/export.
///
/// These are opaque tags passed through on the wire; this crate never parses
/// or produces the formats themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Ruby-style YAML key-value file
    RubyYaml,
    /// gettext portable-object file
    GnuPo,
    /// Apple `.strings` file
    IosStrings,
}

impl FileFormat {
    /// Wire identifier sent as the `format` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::RubyYaml => "RUBY_YAML",
            FileFormat::GnuPo => "GNU_PO",
            FileFormat::IosStrings => "IOS_STRINGS",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured input string: a keyed phrase with optional context index.
///
/// Convenience builder for callers who want a well-formed record without
/// assembling JSON objects by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRecord {
    /// Caller-supplied unique identifier for the phrase
    pub string_key: String,
    /// The source text
    pub string: String,
    /// Disambiguation index when one key maps to several strings
    pub context: Option<usize>,
}

impl StringRecord {
    /// Create a record without a context index
    pub fn new(string_key: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            string_key: string_key.into(),
            string: string.into(),
            context: None,
        }
    }

    /// Attach a context index
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<StringRecord> for Value {
    fn from(record: StringRecord) -> Self {
        match record.context {
            Some(context) => json!({
                "string-key": record.string_key,
                "string": record.string,
                "context": context,
            }),
            None => json!({
                "string-key": record.string_key,
                "string": record.string,
            }),
        }
    }
}

/// The value side of a phrase mapping entry: one text, or ordered variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseValue {
    /// A single source text for the key
    Text(String),
    /// Several contextual variants; each expands with its position as `context`
    Variants(Vec<String>),
}

impl From<&str> for PhraseValue {
    fn from(text: &str) -> Self {
        PhraseValue::Text(text.to_string())
    }
}

impl From<String> for PhraseValue {
    fn from(text: String) -> Self {
        PhraseValue::Text(text)
    }
}

impl From<Vec<String>> for PhraseValue {
    fn from(variants: Vec<String>) -> Self {
        PhraseValue::Variants(variants)
    }
}

impl From<Vec<&str>> for PhraseValue {
    fn from(variants: Vec<&str>) -> Self {
        PhraseValue::Variants(variants.into_iter().map(str::to_string).collect())
    }
}

/// Expand one phrase mapping entry into structured records.
///
/// A `Variants` value of length N yields N records carrying their zero-based
/// position as `context`, in the original order. A `Text` value yields a
/// single record with no `context`.
pub fn expand_phrase(string_key: &str, value: &PhraseValue) -> Vec<Value> {
    match value {
        PhraseValue::Text(text) => vec![StringRecord::new(string_key, text).into()],
        PhraseValue::Variants(variants) => variants
            .iter()
            .enumerate()
            .map(|(index, text)| StringRecord::new(string_key, text).with_context(index).into())
            .collect(),
    }
}

/// Normalize a caller-supplied input string element into its wire shape.
///
/// Plain text becomes `{"string": <text>}`; a structured record gets every
/// key dashified. Anything else is rejected before a request is made.
pub fn normalize_input_string(value: &Value) -> Result<Value> {
    match value {
        Value::String(text) => Ok(json!({ "string": text })),
        Value::Object(record) => Ok(Value::Object(dashify_keys(record))),
        other => Err(ClientError::InvalidInput {
            message: format!("expected text or a record, got {other}"),
        }),
    }
}

/// Replace underscores with hyphens in every key of a record.
///
/// The remote service expects `string-key`, not `string_key`. The conversion
/// is total over all keys; values pass through unchanged.
pub fn dashify_keys(record: &Map<String, Value>) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, value)| (key.replace('_', "-"), value.clone()))
        .collect()
}
