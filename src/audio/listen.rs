//! Bounded microphone listening for the voice-input flow.
//!
//! [`Listener::listen`] opens the default microphone as a scoped resource and
//! runs three phases over the incoming sample stream:
//!
//! 1. **Calibration** — measure the ambient noise floor for a short window
//!    and derive the speech RMS threshold from it.
//! 2. **Wait for speech** — discard buffers until one crosses the threshold;
//!    give up with [`ListenError::NoSpeech`] after the configured wait.
//! 3. **Phrase capture** — accumulate until a trailing-silence hold elapses
//!    or the maximum phrase length is reached (the phrase is truncated, not
//!    rejected).
//!
//! Phase boundaries are measured in received *samples* rather than wall-clock
//! time: audio arrives in real time, so sample count is time, and counting
//! samples keeps the loop deterministic under test.  The captured phrase is
//! returned as 16 kHz mono, ready for WAV encoding.

use std::sync::mpsc;
use std::time::Duration;

use thiserror::Error;

use crate::audio::capture::{CaptureError, Microphone};
use crate::audio::convert::{downmix_to_mono, resample_to_16k};
use crate::config::CaptureConfig;

/// How long to wait for the next hardware buffer before declaring the stream
/// stalled.  Real devices deliver buffers every few milliseconds.
const STREAM_STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Multiplier applied to the calibrated noise-floor RMS to get the speech
/// trigger threshold.
const NOISE_FLOOR_RATIO: f32 = 2.0;

// ---------------------------------------------------------------------------
// ListenError
// ---------------------------------------------------------------------------

/// Errors from a bounded listening attempt.
#[derive(Debug, Error)]
pub enum ListenError {
    /// The microphone could not be opened or started.
    #[error("microphone unavailable: {0}")]
    Capture(#[from] CaptureError),

    /// No buffer crossed the speech threshold within the wait window.
    #[error("no speech detected within {0:.0} seconds")]
    NoSpeech(f32),

    /// The audio stream stopped delivering buffers mid-capture.
    #[error("audio stream stalled or disconnected")]
    Disconnected,
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Captures one bounded speech sample from the default input device.
pub struct Listener {
    config: CaptureConfig,
}

impl Listener {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Open the microphone, capture one phrase, and return it as 16 kHz mono.
    ///
    /// The cpal stream handle lives on this function's stack, so the device
    /// is released on every exit path — success, no-speech timeout, and
    /// stream failure alike.
    pub fn listen(&self) -> Result<Vec<f32>, ListenError> {
        let mic = Microphone::new()?;
        let (tx, rx) = mpsc::channel();
        let _mic_handle = mic.open(tx)?;

        let phrase = capture_phrase(&rx, mic.channels(), mic.sample_rate(), &self.config)?;
        Ok(resample_to_16k(&phrase, mic.sample_rate()))
    }
}

// ---------------------------------------------------------------------------
// Capture loop (microphone-independent, unit-tested)
// ---------------------------------------------------------------------------

/// Root-mean-square amplitude of a buffer; 0.0 for an empty buffer.
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean_sq = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    mean_sq.sqrt()
}

/// Run calibration, wait-for-speech, and phrase capture over `rx`.
///
/// Returns the phrase as mono samples at `sample_rate`.
fn capture_phrase(
    rx: &mpsc::Receiver<Vec<f32>>,
    channels: u16,
    sample_rate: u32,
    config: &CaptureConfig,
) -> Result<Vec<f32>, ListenError> {
    let calibration_samples = (config.calibration_secs * sample_rate as f32) as usize;
    let max_wait_samples = (config.max_wait_secs * sample_rate as f32) as usize;
    let max_phrase_samples = (config.max_phrase_secs * sample_rate as f32) as usize;
    let silence_hold_samples = (config.silence_hold_secs * sample_rate as f32) as usize;

    // ── 1. Calibration ───────────────────────────────────────────────────
    let mut ambient = Vec::with_capacity(calibration_samples);
    while ambient.len() < calibration_samples {
        let buffer = next_buffer(rx)?;
        ambient.extend(downmix_to_mono(&buffer, channels));
    }
    let threshold = (rms(&ambient) * NOISE_FLOOR_RATIO).max(config.min_rms_threshold);
    log::debug!(
        "listen: calibrated over {} samples, threshold = {threshold:.4}",
        ambient.len()
    );

    // ── 2. Wait for speech ───────────────────────────────────────────────
    let mut waited = 0usize;
    let mut phrase: Vec<f32> = loop {
        if waited >= max_wait_samples {
            return Err(ListenError::NoSpeech(config.max_wait_secs));
        }
        let mono = downmix_to_mono(&next_buffer(rx)?, channels);
        if rms(&mono) > threshold {
            break mono;
        }
        waited += mono.len();
    };

    // ── 3. Phrase capture ────────────────────────────────────────────────
    let mut trailing_silence = 0usize;
    while phrase.len() < max_phrase_samples {
        // A stall after speech has begun just ends the phrase.
        let buffer = match next_buffer(rx) {
            Ok(b) => b,
            Err(ListenError::Disconnected) => break,
            Err(e) => return Err(e),
        };
        let mono = downmix_to_mono(&buffer, channels);

        if rms(&mono) > threshold {
            trailing_silence = 0;
        } else {
            trailing_silence += mono.len();
        }
        phrase.extend(mono);

        if trailing_silence >= silence_hold_samples {
            break;
        }
    }
    phrase.truncate(max_phrase_samples);

    log::debug!(
        "listen: captured {} samples ({:.2} s)",
        phrase.len(),
        phrase.len() as f32 / sample_rate as f32
    );
    Ok(phrase)
}

fn next_buffer(rx: &mpsc::Receiver<Vec<f32>>) -> Result<Vec<f32>, ListenError> {
    rx.recv_timeout(STREAM_STALL_TIMEOUT)
        .map_err(|_| ListenError::Disconnected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 kHz is a convenient test rate: 1 sample = 1 ms.
    const RATE: u32 = 1_000;

    fn test_config() -> CaptureConfig {
        CaptureConfig {
            calibration_secs: 0.1,
            max_wait_secs: 0.5,
            max_phrase_secs: 1.0,
            silence_hold_secs: 0.2,
            min_rms_threshold: 0.01,
        }
    }

    /// Send `buffers` through a channel, then drop the sender so the loop
    /// observes a disconnect after the scripted audio runs out.
    fn feed(buffers: Vec<Vec<f32>>) -> mpsc::Receiver<Vec<f32>> {
        let (tx, rx) = mpsc::channel();
        for b in buffers {
            tx.send(b).expect("send");
        }
        rx
    }

    fn silence(ms: usize) -> Vec<f32> {
        vec![0.0_f32; ms]
    }

    fn voice(ms: usize) -> Vec<f32> {
        vec![0.5_f32; ms]
    }

    // ---- rms ---------------------------------------------------------------

    #[test]
    fn rms_of_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_of_dc_signal() {
        assert!((rms(&[0.5_f32; 100]) - 0.5).abs() < 1e-6);
    }

    // ---- capture_phrase ----------------------------------------------------

    #[test]
    fn captures_phrase_after_calibration() {
        // 100 ms calibration silence, 50 ms leading silence, 300 ms voice,
        // then enough trailing silence to trip the 200 ms hold.
        let rx = feed(vec![
            silence(100),
            silence(50),
            voice(300),
            silence(100),
            silence(100),
            silence(100),
        ]);

        let phrase = capture_phrase(&rx, 1, RATE, &test_config()).expect("phrase");
        // voice + trailing silence up to the hold
        assert!(phrase.len() >= 300, "got {}", phrase.len());
        assert!(rms(&phrase) > 0.01);
    }

    #[test]
    fn no_speech_times_out() {
        // 100 ms calibration + 500 ms of silence exhausts the wait window.
        let rx = feed(vec![silence(100), silence(200), silence(200), silence(200)]);

        let err = capture_phrase(&rx, 1, RATE, &test_config()).unwrap_err();
        assert!(matches!(err, ListenError::NoSpeech(_)));
    }

    #[test]
    fn phrase_is_truncated_at_max_length() {
        // 2 s of continuous voice against a 1 s phrase cap.
        let rx = feed(vec![silence(100), voice(500), voice(500), voice(500), voice(500)]);

        let phrase = capture_phrase(&rx, 1, RATE, &test_config()).expect("phrase");
        assert_eq!(phrase.len(), 1_000);
    }

    #[test]
    fn trailing_silence_ends_phrase_early() {
        let rx = feed(vec![silence(100), voice(100), silence(250), voice(500)]);

        let phrase = capture_phrase(&rx, 1, RATE, &test_config()).expect("phrase");
        // ends at the silence hold; the later voice burst is never consumed
        assert!(phrase.len() < 500, "got {}", phrase.len());
    }

    #[test]
    fn disconnect_during_calibration_is_an_error() {
        let rx = feed(vec![silence(20)]);

        let err = capture_phrase(&rx, 1, RATE, &test_config()).unwrap_err();
        assert!(matches!(err, ListenError::Disconnected));
    }

    #[test]
    fn disconnect_after_speech_ends_the_phrase() {
        let rx = feed(vec![silence(100), voice(150)]);

        let phrase = capture_phrase(&rx, 1, RATE, &test_config()).expect("phrase");
        assert_eq!(phrase.len(), 150);
    }

    #[test]
    fn stereo_buffers_are_downmixed() {
        // Interleaved stereo: twice the samples per buffer, same duration.
        let stereo_voice = vec![0.5_f32; 600]; // 300 ms at 1 kHz stereo
        let stereo_silence = vec![0.0_f32; 200]; // 100 ms

        let rx = feed(vec![
            stereo_silence.clone(),
            stereo_voice,
            stereo_silence.clone(),
            stereo_silence.clone(),
            stereo_silence,
        ]);

        let phrase = capture_phrase(&rx, 2, RATE, &test_config()).expect("phrase");
        assert!(phrase.len() >= 300, "got {}", phrase.len());
    }
}
