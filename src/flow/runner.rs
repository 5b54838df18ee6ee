//! Flow runner — drives the translate, voice-input, and voice-output flows.
//!
//! [`FlowRunner`] owns the three service adapters and responds to
//! [`FlowCommand`]s received over a `tokio::sync::mpsc` channel.  Commands
//! are processed one at a time, so no two flows can overlap; the UI
//! additionally disables its triggers while the session is busy.
//!
//! # Flow shape
//!
//! Every flow follows the same discipline:
//!
//! 1. validate preconditions — a violation rejects the invocation *before*
//!    the busy state is entered and before any external call;
//! 2. enter the busy phase through a [`BusyGuard`], which restores `Idle` on
//!    every exit path;
//! 3. call the adapter(s), pushing blocking work (microphone capture, audio
//!    playback) onto `tokio::task::spawn_blocking` so the runtime never
//!    stalls;
//! 4. on success, write the result into the session; on failure, leave the
//!    session's text fields untouched and surface a [`Notice`].
//!
//! There is no cancellation and no retry: once issued, a call runs to
//! success or failure, and each failure is reported exactly once.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::{encode_wav, play_blocking, play_detached, Listener, SpeechArtifact};
use crate::config::{AppConfig, PlaybackMode};
use crate::speech::{SpeechRecognizer, SpeechSynthesizer};
use crate::translate::Translator;

use super::state::{BusyGuard, FlowPhase, Notice, SharedSession};

// ---------------------------------------------------------------------------
// FlowCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the flow runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    /// Run the translation flow on the current input text.
    Translate,
    /// Exchange source and target selections, then translate unconditionally.
    SwapLanguages,
    /// Capture speech from the microphone and transcribe it into the input.
    VoiceInput,
    /// Synthesize the current output text and play it.
    VoiceOutput,
}

// ---------------------------------------------------------------------------
// FlowError
// ---------------------------------------------------------------------------

/// Validation messages, worded for direct display to the user.
pub const MSG_EMPTY_INPUT: &str = "Please enter text to translate";
pub const MSG_SAME_LANGUAGE: &str = "Source and target language are the same";
pub const MSG_NO_TEXT_TO_SPEAK: &str = "No text to speak";

/// Failure of one flow invocation.
///
/// `Validation` means a precondition was rejected before any external call;
/// the other variants wrap the failing adapter's message.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    Translation(String),

    #[error("{0}")]
    SpeechRecognition(String),

    #[error("{0}")]
    VoiceOutput(String),
}

impl FlowError {
    /// Map the error variant to the modal notice shown to the user.
    pub fn into_notice(self) -> Notice {
        match self {
            FlowError::Validation(msg) => Notice::warning("Error", msg),
            FlowError::Translation(msg) => Notice::critical("Translation error", msg),
            FlowError::SpeechRecognition(msg) => {
                Notice::critical("Speech recognition error", msg)
            }
            FlowError::VoiceOutput(msg) => Notice::critical("Voice output error", msg),
        }
    }
}

// ---------------------------------------------------------------------------
// FlowRunner
// ---------------------------------------------------------------------------

/// Drives the external-call flows against the shared session.
///
/// Create with [`FlowRunner::new`], then call [`run`](Self::run) inside a
/// tokio task.
pub struct FlowRunner {
    session: SharedSession,
    translator: Arc<dyn Translator>,
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: AppConfig,
    artifact_dir: PathBuf,
}

impl FlowRunner {
    /// Create a new runner.  Speech artifacts go to the OS temp directory.
    pub fn new(
        session: SharedSession,
        translator: Arc<dyn Translator>,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: AppConfig,
    ) -> Self {
        Self {
            session,
            translator,
            recognizer,
            synthesizer,
            config,
            artifact_dir: std::env::temp_dir(),
        }
    }

    /// Redirect speech artifacts to `dir` (used by tests).
    pub fn with_artifact_dir(mut self, dir: PathBuf) -> Self {
        self.artifact_dir = dir;
        self
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the flow loop until `command_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`.  It never returns while the channel is open.
    pub async fn run(self, mut command_rx: mpsc::Receiver<FlowCommand>) {
        while let Some(cmd) = command_rx.recv().await {
            log::debug!("flow: received {cmd:?}");
            let result = match cmd {
                FlowCommand::Translate => self.run_translate().await,
                FlowCommand::SwapLanguages => self.run_swap().await,
                FlowCommand::VoiceInput => self.run_voice_input().await,
                FlowCommand::VoiceOutput => self.run_voice_output().await,
            };
            self.finish(result);
        }

        log::info!("flow: command channel closed, runner shutting down");
    }

    /// Surface a flow failure as a modal notice; successes need no epilogue.
    fn finish(&self, result: Result<(), FlowError>) {
        if let Err(err) = result {
            log::warn!("flow failed: {err}");
            self.session.lock().unwrap().notice = Some(err.into_notice());
        }
    }

    // -----------------------------------------------------------------------
    // Translation flow
    // -----------------------------------------------------------------------

    async fn run_translate(&self) -> Result<(), FlowError> {
        let (text, source, target) = {
            let st = self.session.lock().unwrap();
            (st.input_text.trim().to_string(), st.source, st.target)
        };

        if text.is_empty() {
            return Err(FlowError::Validation(MSG_EMPTY_INPUT));
        }
        if source == target {
            return Err(FlowError::Validation(MSG_SAME_LANGUAGE));
        }

        let _busy = BusyGuard::enter(&self.session, FlowPhase::Translating);

        let translated = self
            .translator
            .translate(&text, source.translation_code(), target.translation_code())
            .await
            .map_err(|e| FlowError::Translation(e.to_string()))?;

        self.session.lock().unwrap().output_text = translated;
        Ok(())
    }

    /// Exchange source and target, then translate unconditionally — the
    /// translation flow's own validation still applies.
    async fn run_swap(&self) -> Result<(), FlowError> {
        {
            let mut guard = self.session.lock().unwrap();
            let st = &mut *guard;
            std::mem::swap(&mut st.source, &mut st.target);
        }
        self.run_translate().await
    }

    // -----------------------------------------------------------------------
    // Voice-input flow
    // -----------------------------------------------------------------------

    async fn run_voice_input(&self) -> Result<(), FlowError> {
        let busy = BusyGuard::enter(&self.session, FlowPhase::Listening);

        // Bounded capture opens and releases the microphone internally.
        let listener = Listener::new(self.config.capture.clone());
        let samples = tokio::task::spawn_blocking(move || listener.listen())
            .await
            .map_err(|e| FlowError::SpeechRecognition(e.to_string()))?
            .map_err(|e| FlowError::SpeechRecognition(e.to_string()))?;

        busy.advance(FlowPhase::Recognizing);

        let wav = encode_wav(&samples, crate::audio::RECOGNIZER_RATE)
            .map_err(|e| FlowError::SpeechRecognition(e.to_string()))?;

        let transcript = self
            .recognizer
            .recognize(&wav)
            .await
            .map_err(|e| FlowError::SpeechRecognition(e.to_string()))?;

        // The transcript replaces the input wholesale, it is not appended.
        self.session.lock().unwrap().input_text = transcript;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Voice-output flow
    // -----------------------------------------------------------------------

    async fn run_voice_output(&self) -> Result<(), FlowError> {
        let (text, target) = {
            let st = self.session.lock().unwrap();
            (st.output_text.trim().to_string(), st.target)
        };

        if text.is_empty() {
            return Err(FlowError::Validation(MSG_NO_TEXT_TO_SPEAK));
        }

        let _busy = BusyGuard::enter(&self.session, FlowPhase::Synthesizing);

        // Fresh name every invocation; the artifact deletes itself when it
        // goes out of scope on any path below, including the `?` one.
        let artifact = SpeechArtifact::new_unique(&self.artifact_dir);

        self.synthesizer
            .synthesize(&text, target.synthesis_code(), artifact.path())
            .await
            .map_err(|e| FlowError::VoiceOutput(e.to_string()))?;

        match self.config.synthesis.playback {
            PlaybackMode::Blocking => {
                // Busy state spans the whole playback.
                let outcome = tokio::task::spawn_blocking(move || {
                    let result = play_blocking(artifact.path());
                    drop(artifact);
                    result
                })
                .await;

                match outcome {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(FlowError::VoiceOutput(e.to_string())),
                    Err(e) => Err(FlowError::VoiceOutput(e.to_string())),
                }
            }
            PlaybackMode::Detached => {
                // Busy state ends once playback is initiated; the one-shot
                // completion callback owns the artifact and reports any
                // playback failure.
                let session = Arc::clone(&self.session);
                play_detached(artifact.path().to_path_buf(), move |result| {
                    drop(artifact);
                    if let Err(e) = result {
                        log::warn!("speech playback failed: {e}");
                        session.lock().unwrap().notice =
                            Some(Notice::critical("Voice output error", e.to_string()));
                    }
                });
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::flow::state::{new_shared_session, NoticeLevel};
    use crate::language::Language;
    use crate::speech::{RecognizeError, SynthesizeError};
    use crate::translate::TranslateError;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Records every call; answers with a fixed string or a request error.
    struct MockTranslator {
        calls: Mutex<Vec<(String, String, String)>>,
        response: Option<String>,
    }

    impl MockTranslator {
        fn ok(response: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Some(response.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: None,
            }
        }

        fn calls(&self) -> Vec<(String, String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, TranslateError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), source.to_string(), target.to_string()));
            match &self.response {
                Some(s) => Ok(s.clone()),
                None => Err(TranslateError::Request("connection refused".into())),
            }
        }
    }

    /// Observes the session phase at call time — used to assert that the
    /// busy state brackets the adapter call.
    struct PhaseProbeTranslator {
        session: SharedSession,
        seen: Mutex<Option<FlowPhase>>,
    }

    #[async_trait]
    impl Translator for PhaseProbeTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, TranslateError> {
            let phase = self.session.lock().unwrap().phase;
            *self.seen.lock().unwrap() = Some(phase);
            Ok("probe".into())
        }
    }

    /// Never called in these tests; present to satisfy the constructor.
    struct UnusedRecognizer;

    #[async_trait]
    impl SpeechRecognizer for UnusedRecognizer {
        async fn recognize(&self, _wav: &[u8]) -> Result<String, RecognizeError> {
            Err(RecognizeError::NoTranscript)
        }
    }

    /// Records calls; on success writes a small (undecodable) file to the
    /// requested path so artifact-deletion behaviour can be observed.
    struct MockSynthesizer {
        calls: Mutex<Vec<(String, String, PathBuf)>>,
        fail: bool,
    }

    impl MockSynthesizer {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<(String, String, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynthesizer {
        async fn synthesize(
            &self,
            text: &str,
            language: &str,
            out_path: &Path,
        ) -> Result<(), SynthesizeError> {
            self.calls.lock().unwrap().push((
                text.to_string(),
                language.to_string(),
                out_path.to_path_buf(),
            ));
            if self.fail {
                return Err(SynthesizeError::Status(404));
            }
            std::fs::write(out_path, b"not really mp3").unwrap();
            Ok(())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Fixture {
        runner: FlowRunner,
        session: SharedSession,
        translator: Arc<MockTranslator>,
        synthesizer: Arc<MockSynthesizer>,
        _artifact_dir: tempfile::TempDir,
    }

    fn make_fixture(
        config: AppConfig,
        translator: MockTranslator,
        synthesizer: MockSynthesizer,
    ) -> Fixture {
        let artifact_dir = tempfile::tempdir().expect("temp dir");
        let session = new_shared_session(&UiConfig::default());
        let translator = Arc::new(translator);
        let synthesizer = Arc::new(synthesizer);

        let runner = FlowRunner::new(
            Arc::clone(&session),
            Arc::clone(&translator) as Arc<dyn Translator>,
            Arc::new(UnusedRecognizer),
            Arc::clone(&synthesizer) as Arc<dyn SpeechSynthesizer>,
            config,
        )
        .with_artifact_dir(artifact_dir.path().to_path_buf());

        Fixture {
            runner,
            session,
            translator,
            synthesizer,
            _artifact_dir: artifact_dir,
        }
    }

    fn blocking_playback_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.synthesis.playback = PlaybackMode::Blocking;
        config
    }

    async fn drive(runner: FlowRunner, commands: &[FlowCommand]) {
        let (tx, rx) = mpsc::channel(8);
        for &cmd in commands {
            tx.send(cmd).await.unwrap();
        }
        drop(tx); // close channel so run() returns
        runner.run(rx).await;
    }

    // -----------------------------------------------------------------------
    // Translation flow
    // -----------------------------------------------------------------------

    /// "Hello" en→fr invokes the adapter exactly once with exactly those
    /// arguments and writes its answer to the output.
    #[tokio::test]
    async fn translate_happy_path() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("Bonjour"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().input_text = "Hello".into();

        drive(f.runner, &[FlowCommand::Translate]).await;

        assert_eq!(
            f.translator.calls(),
            vec![("Hello".to_string(), "en".to_string(), "fr".to_string())]
        );
        let st = f.session.lock().unwrap();
        assert_eq!(st.output_text, "Bonjour");
        assert!(st.notice.is_none());
        assert_eq!(st.phase, FlowPhase::Idle);
    }

    #[tokio::test]
    async fn translate_trims_input_before_sending() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("Bonjour"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().input_text = "  Hello \n".into();

        drive(f.runner, &[FlowCommand::Translate]).await;

        assert_eq!(f.translator.calls()[0].0, "Hello");
    }

    /// Empty input is rejected before any external call, with a warning.
    #[tokio::test]
    async fn translate_empty_input_is_rejected() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("never"),
            MockSynthesizer::ok(),
        );

        drive(f.runner, &[FlowCommand::Translate]).await;

        assert!(f.translator.calls().is_empty());
        let st = f.session.lock().unwrap();
        let notice = st.notice.as_ref().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, MSG_EMPTY_INPUT);
        assert_eq!(st.phase, FlowPhase::Idle);
    }

    #[tokio::test]
    async fn translate_whitespace_input_is_rejected() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("never"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().input_text = "   \n\t ".into();

        drive(f.runner, &[FlowCommand::Translate]).await;

        assert!(f.translator.calls().is_empty());
        assert!(f.session.lock().unwrap().notice.is_some());
    }

    /// Identical source and target are rejected before any external call.
    #[tokio::test]
    async fn translate_identical_languages_is_rejected() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("never"),
            MockSynthesizer::ok(),
        );
        {
            let mut st = f.session.lock().unwrap();
            st.input_text = "Hello".into();
            st.target = Language::English; // same as default source
        }

        drive(f.runner, &[FlowCommand::Translate]).await;

        assert!(f.translator.calls().is_empty());
        let st = f.session.lock().unwrap();
        let notice = st.notice.as_ref().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, MSG_SAME_LANGUAGE);
    }

    /// Adapter failure surfaces a critical notice and leaves the session's
    /// text fields untouched.
    #[tokio::test]
    async fn translate_adapter_failure_leaves_state_unchanged() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::failing(),
            MockSynthesizer::ok(),
        );
        {
            let mut st = f.session.lock().unwrap();
            st.input_text = "Hello".into();
            st.output_text = "previous output".into();
        }

        drive(f.runner, &[FlowCommand::Translate]).await;

        let st = f.session.lock().unwrap();
        assert_eq!(st.input_text, "Hello");
        assert_eq!(st.output_text, "previous output");
        let notice = st.notice.as_ref().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Critical);
        assert_eq!(notice.title, "Translation error");
        assert_eq!(st.phase, FlowPhase::Idle);
    }

    /// The busy phase is active exactly while the adapter call runs.
    #[tokio::test]
    async fn translate_brackets_adapter_call_with_busy_phase() {
        let session = new_shared_session(&UiConfig::default());
        session.lock().unwrap().input_text = "Hello".into();
        assert_eq!(session.lock().unwrap().phase, FlowPhase::Idle);

        let probe = Arc::new(PhaseProbeTranslator {
            session: Arc::clone(&session),
            seen: Mutex::new(None),
        });

        let runner = FlowRunner::new(
            Arc::clone(&session),
            Arc::clone(&probe) as Arc<dyn Translator>,
            Arc::new(UnusedRecognizer),
            Arc::new(MockSynthesizer::ok()),
            AppConfig::default(),
        );

        drive(runner, &[FlowCommand::Translate]).await;

        assert_eq!(*probe.seen.lock().unwrap(), Some(FlowPhase::Translating));
        assert_eq!(session.lock().unwrap().phase, FlowPhase::Idle);
    }

    // -----------------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------------

    /// Swapping (en, fr) and translating is the same adapter call as having
    /// selected (fr, en) directly.
    #[tokio::test]
    async fn swap_exchanges_languages_and_translates() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("Hello"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().input_text = "Bonjour".into();

        drive(f.runner, &[FlowCommand::SwapLanguages]).await;

        assert_eq!(
            f.translator.calls(),
            vec![("Bonjour".to_string(), "fr".to_string(), "en".to_string())]
        );
        let st = f.session.lock().unwrap();
        assert_eq!(st.source, Language::French);
        assert_eq!(st.target, Language::English);
        assert_eq!(st.output_text, "Hello");
    }

    /// Swap runs the translation flow even when it can only fail validation.
    #[tokio::test]
    async fn swap_with_empty_input_still_swaps_and_reports() {
        let f = make_fixture(
            AppConfig::default(),
            MockTranslator::ok("never"),
            MockSynthesizer::ok(),
        );

        drive(f.runner, &[FlowCommand::SwapLanguages]).await;

        assert!(f.translator.calls().is_empty());
        let st = f.session.lock().unwrap();
        assert_eq!(st.source, Language::French);
        assert_eq!(st.target, Language::English);
        assert!(st.notice.is_some());
    }

    // -----------------------------------------------------------------------
    // Voice-output flow
    // -----------------------------------------------------------------------

    /// "Bonjour" with target French reaches the synthesizer as
    /// ("Bonjour", "fr"), and the artifact is gone once the flow completes —
    /// here playback fails to decode the fake bytes, which is exactly the
    /// failure path the deletion guarantee must survive.
    #[tokio::test]
    async fn voice_output_synthesizes_with_synthesis_code_and_cleans_up() {
        let f = make_fixture(
            blocking_playback_config(),
            MockTranslator::ok("unused"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().output_text = "Bonjour".into();

        drive(f.runner, &[FlowCommand::VoiceOutput]).await;

        let calls = f.synthesizer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Bonjour");
        assert_eq!(calls[0].1, "fr");
        assert!(
            !calls[0].2.exists(),
            "artifact should be deleted after the flow"
        );
        assert_eq!(f.session.lock().unwrap().phase, FlowPhase::Idle);
    }

    /// Sanskrit output is synthesized with the Hindi fallback voice.
    #[tokio::test]
    async fn voice_output_uses_fallback_voice_for_sanskrit() {
        let f = make_fixture(
            blocking_playback_config(),
            MockTranslator::ok("unused"),
            MockSynthesizer::ok(),
        );
        {
            let mut st = f.session.lock().unwrap();
            st.target = Language::Sanskrit;
            st.output_text = "नमः".into();
        }

        drive(f.runner, &[FlowCommand::VoiceOutput]).await;

        assert_eq!(f.synthesizer.calls()[0].1, "hi");
    }

    #[tokio::test]
    async fn voice_output_empty_text_is_rejected() {
        let f = make_fixture(
            blocking_playback_config(),
            MockTranslator::ok("unused"),
            MockSynthesizer::ok(),
        );

        drive(f.runner, &[FlowCommand::VoiceOutput]).await;

        assert!(f.synthesizer.calls().is_empty());
        let st = f.session.lock().unwrap();
        let notice = st.notice.as_ref().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, MSG_NO_TEXT_TO_SPEAK);
    }

    /// Synthesis failure surfaces a critical notice and leaves no file.
    #[tokio::test]
    async fn voice_output_synthesis_failure_cleans_up() {
        let f = make_fixture(
            blocking_playback_config(),
            MockTranslator::ok("unused"),
            MockSynthesizer::failing(),
        );
        f.session.lock().unwrap().output_text = "Bonjour".into();

        drive(f.runner, &[FlowCommand::VoiceOutput]).await;

        let calls = f.synthesizer.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].2.exists());
        let st = f.session.lock().unwrap();
        let notice = st.notice.as_ref().expect("notice");
        assert_eq!(notice.title, "Voice output error");
        assert_eq!(st.phase, FlowPhase::Idle);
    }

    /// Two consecutive invocations never reuse an artifact filename.
    #[tokio::test]
    async fn voice_output_never_reuses_artifact_names() {
        let f = make_fixture(
            blocking_playback_config(),
            MockTranslator::ok("unused"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().output_text = "Bonjour".into();

        drive(
            f.runner,
            &[FlowCommand::VoiceOutput, FlowCommand::VoiceOutput],
        )
        .await;

        let calls = f.synthesizer.calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].2, calls[1].2);
    }

    /// Detached playback still deletes the artifact — the completion
    /// callback owns it and runs even when decoding fails immediately.
    #[tokio::test]
    async fn voice_output_detached_deletes_artifact_eventually() {
        let f = make_fixture(
            AppConfig::default(), // Detached is the default mode
            MockTranslator::ok("unused"),
            MockSynthesizer::ok(),
        );
        f.session.lock().unwrap().output_text = "Bonjour".into();

        drive(f.runner, &[FlowCommand::VoiceOutput]).await;

        let path = f.synthesizer.calls()[0].2.clone();
        for _ in 0..100 {
            if !path.exists() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("artifact {} still exists after detached playback", path.display());
    }
}
