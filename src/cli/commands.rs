//! CLI command definitions and handlers

use clap::Subcommand;
use tracing::info;

use crate::core::config::TranslatorConfig;
use crate::core::endpoint::Variant;
use crate::core::models::{with_formality, with_source_lang, TranslateOption};
use crate::core::segment::{text_to_segments, Text};

/// Commands for DeepLX Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate text
    Translate {
        /// Text to translate
        #[arg(short = 'x', long)]
        text: String,

        /// Target language (default: ZH)
        #[arg(short, long, default_value = "ZH")]
        target_lang: String,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        source_lang: Option<String>,

        /// Formality: default, more, less, prefer_more, prefer_less
        #[arg(long)]
        formality: Option<String>,

        /// Parse --text as JSON (a string or an array of strings)
        #[arg(long)]
        json: bool,

        /// Print the full structured result as JSON
        #[arg(long)]
        detail: bool,
    },

    /// Show how text would be split into segments, without sending it
    Segment {
        /// Text to split
        #[arg(short = 'x', long)]
        text: String,
    },
}

/// Parse the raw text argument
pub fn parse_text(raw: &str, json: bool) -> anyhow::Result<Text> {
    if !json {
        return Ok(Text::from(raw));
    }
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(Text::try_from(value)?)
}

/// Handle translate command
pub async fn handle_translate(
    config: TranslatorConfig,
    text: String,
    target_lang: String,
    source_lang: Option<String>,
    formality: Option<String>,
    json: bool,
    detail: bool,
) -> anyhow::Result<()> {
    let text = parse_text(&text, json)?;
    let translator = config.into_translator([])?;

    let mut opts: Vec<TranslateOption> = Vec::new();
    if let Some(lang) = source_lang {
        opts.push(with_source_lang(lang));
    }
    if let Some(formality) = formality {
        opts.push(with_formality(&formality));
    }

    info!("Translating to {}", target_lang);

    if !detail {
        let translated = translator.translate_text(text, &target_lang, opts).await?;
        println!("{}", translated);
        return Ok(());
    }

    let output = match translator.version().variant() {
        Variant::V1 => {
            let result = translator.translate_text_v1(text, &target_lang, opts).await?;
            serde_json::to_string_pretty(&result)?
        }
        Variant::V2 => {
            let result = translator.translate_text_v2(text, &target_lang, opts).await?;
            serde_json::to_string_pretty(&result)?
        }
    };
    println!("{}", output);

    Ok(())
}

/// Handle segment command
pub fn handle_segment(text: String) -> anyhow::Result<()> {
    for (i, segment) in text_to_segments(Text::from(text)).iter().enumerate() {
        println!("{:>3}: {:?}", i + 1, segment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TranslationError;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse_text("[1, 2]", false).unwrap(), Text::from("[1, 2]"));
    }

    #[test]
    fn test_parse_json_text() {
        assert_eq!(
            parse_text(r#"["Hello", "World"]"#, true).unwrap(),
            Text::from(["Hello", "World"])
        );
        assert_eq!(parse_text(r#""Hello""#, true).unwrap(), Text::from("Hello"));
    }

    #[test]
    fn test_parse_json_rejects_numbers() {
        let err = parse_text("42", true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranslationError>(),
            Some(TranslationError::UnsupportedTextType)
        ));
    }
}
