//! Microphone capture via `cpal`.
//!
//! [`Microphone`] wraps the cpal host/device/stream lifecycle.  Call
//! [`Microphone::open`] to begin streaming raw sample buffers over an mpsc
//! channel.  The returned [`MicHandle`] is a RAII guard — dropping it stops
//! the underlying cpal stream and releases the audio device, which is what
//! gives the voice-input flow its guaranteed device release on every exit
//! path.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running the audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// MicHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value stops the underlying hardware stream and releases the
/// input device.
pub struct MicHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// Microphone
// ---------------------------------------------------------------------------

/// System default input device, queried for its preferred configuration.
///
/// Buffers delivered over the channel are interleaved `f32` samples in
/// `[-1.0, 1.0]` at the device-native [`sample_rate`](Self::sample_rate) and
/// [`channels`](Self::channels); use [`crate::audio::convert`] to turn them
/// into the 16 kHz mono stream the recognizer upload expects.
pub struct Microphone {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl Microphone {
    /// Create a [`Microphone`] bound to the system default input device.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is available,
    /// or [`CaptureError::DefaultConfig`] when the device cannot report a
    /// default stream configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming and send each hardware buffer to `tx`.
    ///
    /// The cpal callback runs on a dedicated audio thread; send errors
    /// (receiver dropped) are silently ignored so the audio thread never
    /// panics.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::BuildStream`] or [`CaptureError::PlayStream`]
    /// if the platform rejects the stream configuration.
    pub fn open(&self, tx: mpsc::Sender<Vec<f32>>) -> Result<MicHandle, CaptureError> {
        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(data.to_vec());
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(MicHandle { _stream: stream })
    }

    /// Native sample rate of the capture stream in Hz (commonly 44 100 or
    /// 48 000).
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each delivered buffer.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
