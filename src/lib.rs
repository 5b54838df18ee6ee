//! Voice Translator — translate text between languages with speech input and
//! spoken output.
//!
//! The crate is a thin orchestration shell around three remote services
//! (translation, speech recognition, speech synthesis) plus local audio
//! capture and playback:
//!
//! ```text
//! egui window (app)
//!     │  FlowCommand (mpsc)
//!     ▼
//! FlowRunner (tokio task)
//!     ├─ Translate    → translate::Translator      (HTTP)
//!     ├─ Voice input  → audio::Listener (cpal) → speech::SpeechRecognizer (HTTP)
//!     └─ Voice output → speech::SpeechSynthesizer (HTTP) → audio::playback (rodio)
//!
//! SharedSession (Arc<Mutex<SessionState>>) ←── read by egui update() each frame
//! ```

pub mod app;
pub mod audio;
pub mod config;
pub mod flow;
pub mod language;
pub mod speech;
pub mod translate;
