//! Core `Translator` trait and `HttpTranslator` implementation.
//!
//! `HttpTranslator` calls any endpoint speaking the `/translate_a/single`
//! wire format (the same one the original Google web translator speaks).
//! The base URL comes from [`TranslateConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslateConfig;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during a translation call.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status (unsupported pair,
    /// rate limit, provider outage).
    #[error("translation service returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The service returned a response with no translated text.
    #[error("translation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => TranslateError::Status(status.as_u16()),
            None => TranslateError::Request(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for translation backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Translator>`).
///
/// # Arguments
/// * `text`   – Source text, already trimmed and validated non-empty.
/// * `source` – Source language code (translation code space).
/// * `target` – Target language code (translation code space).
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// HttpTranslator
// ---------------------------------------------------------------------------

/// Calls a `/translate_a/single` endpoint.
///
/// The response is a nested JSON array whose first element lists translated
/// segments; the adapter concatenates the segment texts into one string.
///
/// No request timeout is configured: a translation call either completes or
/// fails at the transport level, and the flow reports whichever happens.
pub struct HttpTranslator {
    client: reqwest::Client,
    config: TranslateConfig,
}

impl HttpTranslator {
    /// Build an `HttpTranslator` from application config.
    pub fn from_config(config: &TranslateConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/translate_a/single", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        parse_translation(&json)
    }
}

/// Extract the translated text from a `/translate_a/single` response.
///
/// The payload looks like `[[["Bonjour","Hello",…],["!","!",…]],…]`; element
/// `[0]` is the segment list and each segment's element `[0]` is the
/// translated text.
fn parse_translation(json: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Parse("missing segment list".into()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
            translated.push_str(part);
        }
    }

    if translated.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }

    Ok(translated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
