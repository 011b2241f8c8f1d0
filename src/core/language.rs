use crate::core::document::Document;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Textual representation used by the raw-document view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Yaml => "yaml",
            Language::Json => "json",
        })
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "yaml" | "yml" => Ok(Language::Yaml),
            "json" => Ok(Language::Json),
            other => Err(LanguageError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("unknown language tag: {0}")]
    UnknownLanguage(String),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes a document for the raw-text surface.
pub fn to_text(language: Language, document: &Document) -> Result<String, LanguageError> {
    match language {
        Language::Yaml => Ok(serde_yaml::to_string(document.as_value())?),
        Language::Json => Ok(serde_json::to_string_pretty(document.as_value())?),
    }
}

/// Parses raw-text surface content back into a document. An empty or
/// null body yields an empty document rather than an error, so a cleared
/// editor pane stays editable.
pub fn to_document(language: Language, text: &str) -> Result<Document, LanguageError> {
    let value: Value = match language {
        Language::Yaml => serde_yaml::from_str(text)?,
        Language::Json => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(text)?
            }
        }
    };
    match value {
        Value::Null => Ok(Document::new()),
        other => Ok(Document::from_value(other)),
    }
}
