//! DeepLX Translator - resilient DeepL / DeepLX translation client
//!
//! This library builds authenticated translate requests, retries transient
//! failures with exponential backoff, and normalizes the V1 (flat) and V2
//! (segmented) response shapes into a single translated string.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::{
        with_api_version, with_base_url, with_http_client, with_reqwest_client,
        with_retry_policy, with_timeout, Translator, TranslatorOption,
    },
    config::TranslatorConfig,
    endpoint::{ApiVersion, Tier, Variant},
    errors::{Result, TranslationError},
    models::{
        with_context, with_formality, with_glossary_id, with_preserve_formatting,
        with_source_lang, with_split_sentences, with_tag_handling, TranslateOption,
        TranslateOptions, TranslationResult, TranslationResultV1, TranslationResultV2,
    },
    retry::{Backoff, RetryPolicy},
    segment::Text,
    transport::{HttpResponse, HttpTransport, PreparedRequest},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
