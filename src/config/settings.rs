//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::language::Language;

use super::AppPaths;

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the translation service adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of a service speaking the `/translate_a/single` wire format.
    pub base_url: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecognizerConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-recognition service adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Base URL of a service speaking the Speech v2 `/recognize` wire format.
    pub base_url: String,
    /// API key — `None` for endpoints that require no authentication.
    pub api_key: Option<String>,
    /// Recognition language as a BCP-47 tag (e.g. `"en-US"`).
    pub language: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.google.com/speech-api/v2".into(),
            api_key: None,
            language: "en-US".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// How the synthesized speech artifact is played back.
///
/// | Variant  | Behaviour                                              |
/// |----------|--------------------------------------------------------|
/// | Detached | Playback thread; busy state ends once playback starts |
/// | Blocking | Flow waits for end of playback before going idle      |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Play on a background thread; the artifact is deleted by a one-shot
    /// completion callback.
    Detached,
    /// Play to completion inside the flow, then delete the artifact.
    Blocking,
}

impl Default for PlaybackMode {
    fn default() -> Self {
        Self::Detached
    }
}

/// Settings for the speech-synthesis service adapter and playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Base URL of a service speaking the `/translate_tts` wire format.
    pub base_url: String,
    /// Playback strategy for the synthesized artifact.
    pub playback: PlaybackMode,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".into(),
            playback: PlaybackMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for the bounded microphone capture used by voice input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Ambient-noise calibration window in seconds before listening starts.
    pub calibration_secs: f32,
    /// Maximum seconds to wait for speech to begin.
    pub max_wait_secs: f32,
    /// Maximum phrase length in seconds; capture stops when reached.
    pub max_phrase_secs: f32,
    /// Trailing silence in seconds that ends the phrase early.
    pub silence_hold_secs: f32,
    /// Lower bound on the speech RMS threshold, applied after calibration so
    /// a dead-silent room does not trigger on noise-floor jitter.
    pub min_rms_threshold: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            calibration_secs: 0.5,
            max_wait_secs: 5.0,
            max_phrase_secs: 10.0,
            silence_hold_secs: 0.8,
            min_rms_threshold: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and default selections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Source language preselected on startup.
    pub default_source: Language,
    /// Target language preselected on startup.  Defaults to a different
    /// language than the source so a fresh session can translate immediately.
    pub default_target: Language,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            default_source: Language::English,
            default_target: Language::French,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Only service endpoints, capture bounds, playback mode and window placement
/// live here.  Session state (texts, current selections) is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Translation service settings.
    pub translate: TranslateConfig,
    /// Speech-recognition service settings.
    pub recognizer: RecognizerConfig,
    /// Speech-synthesis service and playback settings.
    pub synthesis: SynthesisConfig,
    /// Microphone capture bounds.
    pub capture: CaptureConfig,
    /// Window placement and default selections.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
