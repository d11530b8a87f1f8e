//! Text normalization and sentence segmentation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::{Result, TranslationError};

/// Strings with fewer characters than this are sent as a single segment
pub const SEGMENT_THRESHOLD: usize = 100;

/// Sentence terminators, applied in this order
pub const DEFAULT_SENTENCE_TERMINATORS: &[&str] = &[
    // English
    ".", ";", "!", "?",
    // CJK
    "。", "；", "！", "？",
    // Newline
    "\n",
];

/// Text payload: one string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::Single(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text::Single(text)
    }
}

impl From<Vec<String>> for Text {
    fn from(texts: Vec<String>) -> Self {
        Text::Many(texts)
    }
}

impl From<&[&str]> for Text {
    fn from(texts: &[&str]) -> Self {
        Text::Many(texts.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Text {
    fn from(texts: [&str; N]) -> Self {
        Text::Many(texts.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Value> for Text {
    type Error = TranslationError;

    /// Accepts a JSON string or an array whose elements are all strings
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Text::Single(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(TranslationError::UnsupportedTextType),
                })
                .collect::<Result<Vec<_>>>()
                .map(Text::Many),
            _ => Err(TranslationError::UnsupportedTextType),
        }
    }
}

/// Collapse text into one string, joining list entries with newlines
pub fn text_to_string(text: Text) -> String {
    match text {
        Text::Single(s) => s,
        Text::Many(texts) => texts.join("\n"),
    }
}

/// Turn text into the segment list expected by array-based endpoints
pub fn text_to_segments(text: Text) -> Vec<String> {
    match text {
        Text::Single(s) if s.chars().count() < SEGMENT_THRESHOLD => vec![s],
        Text::Single(s) => split_texts_after(&s, DEFAULT_SENTENCE_TERMINATORS),
        Text::Many(texts) => texts,
    }
}

/// Split `text` right after every occurrence of each separator.
///
/// Separators are applied one pass at a time in the given order, each pass
/// re-splitting the fragments produced by the previous one. Separators stay
/// attached to the fragment they end. Blank fragments are dropped.
pub fn split_texts_after(text: &str, separators: &[&str]) -> Vec<String> {
    let mut results = vec![text.to_string()];
    for sep in separators.iter().filter(|sep| !sep.is_empty()) {
        results = results
            .iter()
            .flat_map(|fragment| fragment.split_inclusive(sep))
            .map(str::to_string)
            .collect();
    }
    results.retain(|s| !s.trim().is_empty());
    results
}
