//! Audio layer — microphone capture, bounded listening, format conversion,
//! WAV encoding, artifact lifecycle, and playback.
//!
//! # Voice input
//!
//! ```text
//! Microphone (cpal) → buffers (mpsc) → Listener
//!     calibrate → wait for speech → capture phrase
//!         → downmix_to_mono → resample_to_16k → encode_wav → recognizer
//! ```
//!
//! # Voice output
//!
//! ```text
//! SpeechArtifact (unique name) ← synthesizer writes MP3
//!     → play_blocking | play_detached (rodio) → artifact dropped → deleted
//! ```

pub mod artifact;
pub mod capture;
pub mod convert;
pub mod listen;
pub mod playback;
pub mod wav;

pub use artifact::SpeechArtifact;
pub use capture::{CaptureError, MicHandle, Microphone};
pub use convert::{downmix_to_mono, resample_to_16k, RECOGNIZER_RATE};
pub use listen::{ListenError, Listener};
pub use playback::{play_blocking, play_detached, PlaybackError};
pub use wav::{encode_wav, WavError};
