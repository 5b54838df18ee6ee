//! Core `SpeechRecognizer` trait and `HttpRecognizer` implementation.
//!
//! `HttpRecognizer` posts a 16 kHz mono 16-bit WAV sample to any endpoint
//! speaking the Speech v2 `/recognize` wire format.  The endpoint answers
//! with one JSON object per line; the first lines may carry an empty result
//! list while the service is still deciding, so the parser scans for the
//! first line with a usable alternative.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::RecognizerConfig;

// ---------------------------------------------------------------------------
// RecognizeError
// ---------------------------------------------------------------------------

/// Errors that can occur during a recognition call.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("recognition service returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse recognition response: {0}")]
    Parse(String),

    /// The service understood the request but produced no transcript —
    /// the audio was unintelligible.
    #[error("could not understand the audio")]
    NoTranscript,
}

impl From<reqwest::Error> for RecognizeError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => RecognizeError::Status(status.as_u16()),
            None => RecognizeError::Request(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Async trait for speech-recognition backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn SpeechRecognizer>`).
///
/// The sample is a complete WAV byte buffer; the recognition language is an
/// adapter concern (config), not a per-call argument.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, wav: &[u8]) -> Result<String, RecognizeError>;
}

// ---------------------------------------------------------------------------
// HttpRecognizer
// ---------------------------------------------------------------------------

/// Posts WAV samples to a Speech v2-style `/recognize` endpoint.
///
/// The `key` query parameter is attached **only** when `config.api_key` is
/// `Some(key)` and `key` is non-empty — endpoints without authentication
/// work unchanged.
pub struct HttpRecognizer {
    client: reqwest::Client,
    config: RecognizerConfig,
}

impl HttpRecognizer {
    /// Build an `HttpRecognizer` from application config.
    pub fn from_config(config: &RecognizerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for HttpRecognizer {
    async fn recognize(&self, wav: &[u8]) -> Result<String, RecognizeError> {
        let url = format!("{}/recognize", self.config.base_url);

        let mut req = self
            .client
            .post(&url)
            .query(&[("client", "chromium"), ("lang", self.config.language.as_str())])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("audio/wav; rate={}", crate::audio::RECOGNIZER_RATE),
            )
            .body(wav.to_vec());

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.query(&[("key", key)]);
        }

        let response = req.send().await?.error_for_status()?;
        let body = response.text().await?;

        parse_transcript(&body)
    }
}

/// Extract the first transcript from a newline-delimited JSON response.
///
/// Lines with an empty `result` list are skipped; a body with no usable
/// alternative at all maps to [`RecognizeError::NoTranscript`].
fn parse_transcript(body: &str) -> Result<String, RecognizeError> {
    let mut saw_json = false;

    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| RecognizeError::Parse(e.to_string()))?;
        saw_json = true;

        let transcript = value["result"][0]["alternative"][0]["transcript"].as_str();
        if let Some(text) = transcript {
            let text = text.trim();
            if !text.is_empty() {
                return Ok(text.to_string());
            }
        }
    }

    if saw_json {
        Err(RecognizeError::NoTranscript)
    } else {
        Err(RecognizeError::Parse("empty response body".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
