//! Application entry point — Voice Translator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the three service adapters from config.
//! 5. Create the shared session and the flow-command channel.
//! 6. Spawn the flow runner on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed; closing drops the command sender, which shuts the runner
//!    down.

use std::sync::Arc;

use tokio::sync::mpsc;
use voice_translator::{
    app::TranslatorApp,
    config::AppConfig,
    flow::{new_shared_session, FlowCommand, FlowRunner},
    speech::{HttpRecognizer, HttpSynthesizer, SpeechRecognizer, SpeechSynthesizer},
    translate::{HttpTranslator, Translator},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([740.0, 520.0])
        .with_min_inner_size([560.0, 420.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Translator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — capture/playback block one while
    //    the service call runs on the other)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Service adapters
    let translator: Arc<dyn Translator> =
        Arc::new(HttpTranslator::from_config(&config.translate));
    let recognizer: Arc<dyn SpeechRecognizer> =
        Arc::new(HttpRecognizer::from_config(&config.recognizer));
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::new(HttpSynthesizer::from_config(&config.synthesis));

    // 5. Shared session + command channel
    let session = new_shared_session(&config.ui);
    let (command_tx, command_rx) = mpsc::channel::<FlowCommand>(16);

    // 6. Flow runner on the tokio runtime
    rt.spawn(
        FlowRunner::new(
            Arc::clone(&session),
            translator,
            recognizer,
            synthesizer,
            config.clone(),
        )
        .run(command_rx),
    );

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = TranslatorApp::new(session, command_tx);
    let options = native_options(&config);

    eframe::run_native(
        "Voice Translator",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
