//! Core `SpeechSynthesizer` trait and `HttpSynthesizer` implementation.
//!
//! `HttpSynthesizer` fetches MP3 audio from any endpoint speaking the
//! `/translate_tts` wire format and writes the bytes to the artifact path
//! the caller reserved.  The artifact's lifecycle (naming, deletion) belongs
//! to the voice-output flow; the adapter only produces the file.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SynthesisConfig;

// ---------------------------------------------------------------------------
// SynthesizeError
// ---------------------------------------------------------------------------

/// Errors that can occur during a synthesis call.
#[derive(Debug, Error)]
pub enum SynthesizeError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status (unsupported language,
    /// rate limit, provider outage).
    #[error("synthesis service returned HTTP {0}")]
    Status(u16),

    /// The service answered success but sent no audio bytes.
    #[error("synthesis service returned no audio")]
    EmptyAudio,

    /// The audio bytes could not be written to the artifact path.
    #[error("failed to write audio file: {0}")]
    Write(String),
}

impl From<reqwest::Error> for SynthesizeError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SynthesizeError::Status(status.as_u16()),
            None => SynthesizeError::Request(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for speech-synthesis backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn SpeechSynthesizer>`).
///
/// # Arguments
/// * `text`     – Text to speak, already trimmed and validated non-empty.
/// * `language` – Language code in the synthesis code space
///                ([`crate::language::Language::synthesis_code`]).
/// * `out_path` – Where to write the MP3 artifact.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        out_path: &Path,
    ) -> Result<(), SynthesizeError>;
}

// ---------------------------------------------------------------------------
// HttpSynthesizer
// ---------------------------------------------------------------------------

/// Fetches MP3 speech from a `/translate_tts` endpoint.
///
/// No request timeout is configured, matching the translation adapter: the
/// call either completes or fails at the transport level.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    config: SynthesisConfig,
}

impl HttpSynthesizer {
    /// Build an `HttpSynthesizer` from application config.
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        out_path: &Path,
    ) -> Result<(), SynthesizeError> {
        let url = format!("{}/translate_tts", self.config.base_url);
        let textlen = text.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", text),
                ("tl", language),
                ("total", "1"),
                ("idx", "0"),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SynthesizeError::EmptyAudio);
        }

        std::fs::write(out_path, &bytes).map_err(|e| SynthesizeError::Write(e.to_string()))?;
        log::debug!(
            "synthesized {} bytes of speech to {}",
            bytes.len(),
            out_path.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
