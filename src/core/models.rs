//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::endpoint::Variant;
use crate::core::errors::{Result, TranslationError};
use crate::core::segment::Text;

/// Formality of the translated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl FromStr for Formality {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Formality::Default),
            "more" => Ok(Formality::More),
            "less" => Ok(Formality::Less),
            "prefer_more" => Ok(Formality::PreferMore),
            "prefer_less" => Ok(Formality::PreferLess),
            other => Err(TranslationError::option(format!(
                "invalid formality: {other:?}"
            ))),
        }
    }
}

/// How the service splits input into sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitSentences {
    #[serde(rename = "0")]
    Off,
    #[serde(rename = "1")]
    On,
    #[serde(rename = "nonewlines")]
    NoNewlines,
}

impl FromStr for SplitSentences {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(SplitSentences::Off),
            "1" => Ok(SplitSentences::On),
            "nonewlines" => Ok(SplitSentences::NoNewlines),
            other => Err(TranslationError::option(format!(
                "invalid split_sentences: {other:?}"
            ))),
        }
    }
}

/// Markup handling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagHandling {
    Xml,
    Html,
}

impl FromStr for TagHandling {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xml" => Ok(TagHandling::Xml),
            "html" => Ok(TagHandling::Html),
            other => Err(TranslationError::option(format!(
                "invalid tag_handling: {other:?}"
            ))),
        }
    }
}

/// Optional request fields, built fresh for every call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_sentences: Option<SplitSentences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_formatting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_handling: Option<TagHandling>,
}

/// Mutator applied to [`TranslateOptions`]; may reject its value
pub type TranslateOption = Box<dyn FnOnce(&mut TranslateOptions) -> Result<()> + Send>;

impl TranslateOptions {
    /// Fold `opts` left to right over empty options, stopping at the first failure
    pub fn gather(opts: impl IntoIterator<Item = TranslateOption>) -> Result<Self> {
        let mut options = Self::default();
        for opt in opts {
            opt(&mut options)?;
        }
        Ok(options)
    }
}

/// Source language; empty means auto-detect
pub fn with_source_lang(lang: impl Into<String>) -> TranslateOption {
    let lang = lang.into();
    Box::new(move |o: &mut TranslateOptions| {
        o.source_lang = (!lang.is_empty()).then_some(lang);
        Ok(())
    })
}

/// Formality: `default`, `more`, `less`, `prefer_more` or `prefer_less`
pub fn with_formality(formality: &str) -> TranslateOption {
    let formality = formality.to_string();
    Box::new(move |o: &mut TranslateOptions| {
        o.formality = Some(formality.parse()?);
        Ok(())
    })
}

/// Sentence splitting: `0`, `1` or `nonewlines`
pub fn with_split_sentences(mode: &str) -> TranslateOption {
    let mode = mode.to_string();
    Box::new(move |o: &mut TranslateOptions| {
        o.split_sentences = Some(mode.parse()?);
        Ok(())
    })
}

/// Keep the source formatting instead of letting the engine correct it
pub fn with_preserve_formatting(preserve: bool) -> TranslateOption {
    Box::new(move |o: &mut TranslateOptions| {
        o.preserve_formatting = Some(preserve);
        Ok(())
    })
}

/// Extra context that influences the translation without being translated
pub fn with_context(context: impl Into<String>) -> TranslateOption {
    let context = context.into();
    Box::new(move |o: &mut TranslateOptions| {
        o.context = Some(context);
        Ok(())
    })
}

/// Glossary applied to the request; must not be empty
pub fn with_glossary_id(glossary_id: impl Into<String>) -> TranslateOption {
    let glossary_id = glossary_id.into();
    Box::new(move |o: &mut TranslateOptions| {
        if glossary_id.trim().is_empty() {
            return Err(TranslationError::option("glossary_id must not be empty"));
        }
        o.glossary_id = Some(glossary_id);
        Ok(())
    })
}

/// Markup handling: `xml` or `html`
pub fn with_tag_handling(mode: &str) -> TranslateOption {
    let mode = mode.to_string();
    Box::new(move |o: &mut TranslateOptions| {
        o.tag_handling = Some(mode.parse()?);
        Ok(())
    })
}

/// Translation request body
#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest {
    pub text: Text,
    pub target_lang: String,
    #[serde(flatten)]
    pub options: TranslateOptions,
}

impl TranslationRequest {
    /// Build a request body from normalized text and gathered options
    pub fn new(text: Text, target_lang: impl Into<String>, options: TranslateOptions) -> Self {
        Self {
            text,
            target_lang: target_lang.into(),
            options,
        }
    }
}

/// Flat result returned by the free and pro endpoints
///
/// Only `data` is required, so a segmented body never decodes as this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationResultV1 {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub data: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    #[serde(default)]
    pub method: String,
}

/// One translated segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub detected_source_language: String,
    pub text: String,
}

/// Segmented result returned by the official endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResultV2 {
    pub translations: Vec<Translation>,
}

impl TranslationResultV2 {
    /// Segment texts concatenated in order, without separator
    pub fn joined_text(&self) -> String {
        self.translations.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Decoded result, tagged by response variant
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationResult {
    V1(TranslationResultV1),
    V2(TranslationResultV2),
}

impl TranslationResult {
    /// Response variant this result was decoded as
    pub fn variant(&self) -> Variant {
        match self {
            TranslationResult::V1(_) => Variant::V1,
            TranslationResult::V2(_) => Variant::V2,
        }
    }

    /// Project the result onto a single string
    pub fn into_text(self) -> String {
        match self {
            TranslationResult::V1(result) => result.data,
            TranslationResult::V2(result) => result.joined_text(),
        }
    }
}

impl fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationResult::V1(result) => write!(f, "{}", result.data),
            TranslationResult::V2(result) => write!(f, "{}", result.joined_text()),
        }
    }
}
