//! Async client for the translate, detect and getLangs endpoints

use async_trait::async_trait;
use futures::Stream;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::batching::{self, BatchTranslate};
use crate::core::config::TranslatorConfig;
use crate::core::errors::{BatchError, Result, TranslationError};
use crate::core::models::{ServiceErrorBody, TranslateRequest, TranslateResponse};

/// Client for the Yandex Translate JSON API
#[derive(Debug, Clone)]
pub struct YandexTranslator {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl YandexTranslator {
    /// Create a new translator
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(config)
    }

    /// Configuration in use
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// List the supported translation directions.
    ///
    /// `ui` selects the language of the returned language names and
    /// defaults to the configured UI language.
    pub async fn list_languages(
        &self,
        ui: Option<&str>,
        callback: Option<&str>,
    ) -> Result<serde_json::Value> {
        let mut params = vec![
            ("key", self.config.api_key.as_str()),
            ("ui", ui.unwrap_or(self.config.ui_lang.as_str())),
        ];
        push_optional(&mut params, "callback", callback);

        debug!("GET getLangs (ui={})", params[1].1);
        let response = self
            .client
            .get(self.config.method_url("getLangs"))
            .query(&params)
            .send()
            .await?;

        Self::parse_json(response).await
    }

    /// Translate one batch of texts in a single request.
    ///
    /// The returned list is aligned with `texts`. Non-success statuses are
    /// mapped through [`TranslationError::from_status`].
    pub async fn translate(
        &self,
        texts: &[String],
        request: &TranslateRequest,
    ) -> Result<Vec<String>> {
        let lang = request.lang_param();
        let format = request.format.to_string();

        let mut form: Vec<(&str, &str)> = vec![("key", self.config.api_key.as_str())];
        form.extend(texts.iter().map(|t| ("text", t.as_str())));
        form.push(("lang", lang.as_str()));
        form.push(("format", format.as_str()));
        push_optional(&mut form, "options", request.options.as_deref());
        push_optional(&mut form, "callback", request.callback.as_deref());

        debug!("POST translate ({} texts, lang={})", texts.len(), lang);
        let response = self
            .client
            .post(self.config.method_url("translate"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: TranslateResponse =
            response
                .json()
                .await
                .map_err(|e| TranslationError::InvalidResponseError {
                    message: e.to_string(),
                })?;

        if body.text.len() != texts.len() {
            return Err(TranslationError::InvalidResponseError {
                message: format!(
                    "expected {} translations, got {}",
                    texts.len(),
                    body.text.len()
                ),
            });
        }

        Ok(body.text)
    }

    /// Detect the language of `text`. `hint` is a comma-separated list of
    /// likely languages.
    pub async fn detect_language(
        &self,
        text: &str,
        hint: Option<&str>,
        callback: Option<&str>,
    ) -> Result<serde_json::Value> {
        let mut params = vec![("key", self.config.api_key.as_str()), ("text", text)];
        push_optional(&mut params, "hint", hint);
        push_optional(&mut params, "callback", callback);

        debug!("GET detect ({} chars)", batching::text_len(text));
        let response = self
            .client
            .get(self.config.method_url("detect"))
            .query(&params)
            .send()
            .await?;

        Self::parse_json(response).await
    }

    /// Translate any number of texts, batching them under `max_batch_size`
    /// characters (the configured ceiling when `None`).
    ///
    /// See [`batching::translate_iter`] for the laziness and failure rules.
    pub fn translate_iter<'a, I>(
        &'a self,
        texts: I,
        request: &'a TranslateRequest,
        max_batch_size: Option<usize>,
    ) -> impl Stream<Item = std::result::Result<String, BatchError>> + 'a
    where
        I: IntoIterator<Item = String> + 'a,
        I::IntoIter: Send + 'a,
    {
        let max_batch_size = max_batch_size.unwrap_or(self.config.max_batch_size);
        batching::translate_iter(self, texts, request, max_batch_size)
    }

    async fn parse_json(response: reqwest::Response) -> Result<serde_json::Value> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })
    }

    /// Build the error for a non-success response, preferring the message
    /// from the service's JSON body over the HTTP reason phrase
    async fn status_error(response: reqwest::Response) -> TranslationError {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ServiceErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(reason);

        warn!("{} {}", status.as_u16(), message);
        TranslationError::from_status(status.as_u16(), message)
    }
}

#[async_trait]
impl BatchTranslate for YandexTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        request: &TranslateRequest,
    ) -> Result<Vec<String>> {
        self.translate(texts, request).await
    }
}

fn push_optional<'a>(
    params: &mut Vec<(&'static str, &'a str)>,
    name: &'static str,
    value: Option<&'a str>,
) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.push((name, value));
    }
}
