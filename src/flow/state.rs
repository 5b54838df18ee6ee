//! Session state, busy-phase machine, and the busy guard.
//!
//! [`SessionState`] is the single mutable session object: language
//! selections, input/output text, the current [`FlowPhase`], and any pending
//! [`Notice`] for the user.  It is held behind [`SharedSession`]
//! (`Arc<Mutex<…>>`) — the flow runner mutates it, the egui update loop
//! reads it each frame.  Nothing in it is persisted across runs.
//!
//! [`BusyGuard`] is the busy-state protocol: constructing one puts the
//! session into a busy phase, and its `Drop` impl restores `Idle` on *every*
//! exit path of the wrapped flow — success, `?` early return, or adapter
//! failure.  Flows create the guard only after their validation passes, so
//! rejected invocations never flicker the busy indicator.

use std::sync::{Arc, Mutex};

use crate::config::UiConfig;
use crate::language::Language;

// ---------------------------------------------------------------------------
// FlowPhase
// ---------------------------------------------------------------------------

/// Phases of the external-call flows.
///
/// ```text
/// Idle ──translate──▶ Translating ─────────────────────▶ Idle
///      ──voice in───▶ Listening ──capture done──▶ Recognizing ──▶ Idle
///      ──voice out──▶ Synthesizing ──playback initiated/done──▶ Idle
/// ```
///
/// Exactly one flow runs at a time; the UI disables all triggers whenever
/// the phase is not `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowPhase {
    /// No flow in progress.
    #[default]
    Idle,
    /// The translation service call is in flight.
    Translating,
    /// The microphone is open and capturing.
    Listening,
    /// The captured sample is at the recognition service.
    Recognizing,
    /// Speech is being synthesized (and, in blocking playback mode, played).
    Synthesizing,
}

impl FlowPhase {
    /// Returns `true` while any flow is in progress.
    pub fn is_busy(&self) -> bool {
        !matches!(self, FlowPhase::Idle)
    }

    /// Status line shown while this phase is active.
    pub fn status_message(&self) -> &'static str {
        match self {
            FlowPhase::Idle => "",
            FlowPhase::Translating => "Translating…",
            FlowPhase::Listening => "Listening…",
            FlowPhase::Recognizing => "Recognizing…",
            FlowPhase::Synthesizing => "Generating speech…",
        }
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of a user notice; controls the modal's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// A rejected precondition — nothing was attempted.
    Warning,
    /// An external call failed.
    Critical,
}

/// A one-shot modal notification for the user.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn warning(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title,
            message: message.into(),
        }
    }

    pub fn critical(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Critical,
            title,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The one mutable session object.
///
/// Text fields and selections are only changed by the UI (typing, pickers)
/// and by successful flows; failed flows leave them untouched and reset only
/// the phase and pending notice.
pub struct SessionState {
    /// Currently selected source language.
    pub source: Language,
    /// Currently selected target language.
    pub target: Language,
    /// Editable input text (typed or transcribed).
    pub input_text: String,
    /// Read-only translated output text.
    pub output_text: String,
    /// Current flow phase; `Idle` unless exactly one flow is running.
    pub phase: FlowPhase,
    /// Pending modal notification, cleared when the user dismisses it.
    pub notice: Option<Notice>,
}

impl SessionState {
    /// Fresh session with the configured default selections.
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            source: ui.default_source,
            target: ui.default_target,
            input_text: String::new(),
            output_text: String::new(),
            phase: FlowPhase::Idle,
            notice: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}

/// Thread-safe handle to [`SessionState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedSession`] with the configured defaults.
pub fn new_shared_session(ui: &UiConfig) -> SharedSession {
    Arc::new(Mutex::new(SessionState::new(ui)))
}

// ---------------------------------------------------------------------------
// BusyGuard
// ---------------------------------------------------------------------------

/// Scoped acquisition of the busy state.
///
/// ```rust
/// use voice_translator::flow::{BusyGuard, FlowPhase, new_shared_session};
/// use voice_translator::config::UiConfig;
///
/// let session = new_shared_session(&UiConfig::default());
/// {
///     let guard = BusyGuard::enter(&session, FlowPhase::Listening);
///     assert!(session.lock().unwrap().phase.is_busy());
///     guard.advance(FlowPhase::Recognizing);
/// } // guard dropped — phase restored to Idle
/// assert!(!session.lock().unwrap().phase.is_busy());
/// ```
pub struct BusyGuard {
    session: SharedSession,
}

impl BusyGuard {
    /// Enter `phase`; the session stays busy until the guard is dropped.
    pub fn enter(session: &SharedSession, phase: FlowPhase) -> Self {
        session.lock().unwrap().phase = phase;
        log::debug!("flow: entering {}", phase.status_message());
        Self {
            session: Arc::clone(session),
        }
    }

    /// Switch to a later phase of the same flow (e.g. Listening →
    /// Recognizing) without releasing the busy state.
    pub fn advance(&self, phase: FlowPhase) {
        self.session.lock().unwrap().phase = phase;
        log::debug!("flow: advancing to {}", phase.status_message());
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.session.lock().unwrap().phase = FlowPhase::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
