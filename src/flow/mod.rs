//! Flow orchestration — session state, the busy-state protocol, and the
//! runner that drives the three external-call flows.
//!
//! # Architecture
//!
//! ```text
//! FlowCommand (mpsc)
//!        │
//!        ▼
//! FlowRunner::run()  ← async tokio task
//!        │
//!        ├─ Translate      → validate → [Translating]  → Translator
//!        ├─ SwapLanguages  → swap selections → Translate
//!        ├─ VoiceInput     → [Listening] spawn_blocking(Listener::listen)
//!        │                   → [Recognizing] SpeechRecognizer
//!        └─ VoiceOutput    → validate → [Synthesizing] SpeechSynthesizer
//!                            → playback (blocking or detached) → artifact deleted
//!
//! SharedSession (Arc<Mutex<SessionState>>) ←─── read by egui update() each frame
//! ```
//!
//! Validation failures are rejected before the busy phase is entered;
//! [`BusyGuard`] guarantees the phase returns to `Idle` on every exit path.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{FlowCommand, FlowError, FlowRunner};
pub use state::{
    new_shared_session, BusyGuard, FlowPhase, Notice, NoticeLevel, SessionState, SharedSession,
};
