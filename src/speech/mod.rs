//! Speech service adapters — recognition (speech → text) and synthesis
//! (text → speech artifact).
//!
//! * [`SpeechRecognizer`] / [`HttpRecognizer`] — posts a WAV-encoded sample
//!   to a Speech v2-style `/recognize` endpoint and returns the transcript.
//! * [`SpeechSynthesizer`] / [`HttpSynthesizer`] — fetches MP3 audio from a
//!   `/translate_tts`-style endpoint and writes it to the artifact path the
//!   voice-output flow reserved.

pub mod recognizer;
pub mod synthesizer;

pub use recognizer::{HttpRecognizer, RecognizeError, SpeechRecognizer};
pub use synthesizer::{HttpSynthesizer, SpeechSynthesizer, SynthesizeError};
