//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of the submitted text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Plain text, no markup
    #[default]
    Plain,
    /// HTML markup is preserved by the service
    Html,
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Plain => write!(f, "plain"),
            TextFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(TextFormat::Plain),
            "html" => Ok(TextFormat::Html),
            other => Err(format!("unknown text format: {other} (expected plain or html)")),
        }
    }
}

/// Parameters shared by every batch of one translation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    /// Source language; detected by the service when `None`
    pub source_lang: Option<String>,
    /// Target language
    pub target_lang: String,
    /// Text format
    #[serde(default)]
    pub format: TextFormat,
    /// Service `options` flags
    pub options: Option<String>,
    /// JSONP callback name
    pub callback: Option<String>,
}

impl TranslateRequest {
    /// Request translating into `target_lang`
    pub fn new(target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: None,
            target_lang: target_lang.into(),
            format: TextFormat::Plain,
            options: None,
            callback: None,
        }
    }

    /// Set the source language
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }

    /// Set the text format
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the service options
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Set the JSONP callback
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Value of the `lang` parameter: `<source>-<target>`, or just the
    /// target when the source should be detected by the service.
    pub fn lang_param(&self) -> String {
        match self.source_lang.as_deref().filter(|s| !s.is_empty()) {
            Some(source) => format!("{}-{}", source, self.target_lang),
            None => self.target_lang.clone(),
        }
    }
}

/// Successful `/translate` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    /// Service status code
    #[serde(default)]
    pub code: u16,
    /// Direction actually used, e.g. `en-ru`
    #[serde(default)]
    pub lang: Option<String>,
    /// Translations aligned with the submitted texts
    pub text: Vec<String>,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    /// Service status code
    pub code: u16,
    /// Human-readable reason
    pub message: String,
}
