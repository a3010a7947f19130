//! Yandex Translator - batching client for the Yandex Translate web API
//!
//! This library formats requests for the translate, detect and getLangs
//! endpoints, and translates long lists of texts in character-bounded
//! batches exposed as a lazy stream.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use core::{
    batching::{partition, translate_all, translate_iter, BatchTranslate, Batches},
    client::YandexTranslator,
    config::TranslatorConfig,
    errors::{BatchError, ErrorKind, TranslationError},
    models::{TextFormat, TranslateRequest, TranslateResponse},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
