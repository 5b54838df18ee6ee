//! Translator window — egui/eframe application.
//!
//! # Architecture
//!
//! [`TranslatorApp`] is the top-level [`eframe::App`].  It holds the
//! [`SharedSession`] and the sender half of the flow-command channel; every
//! frame it reads the session, renders the window, and translates user
//! interactions into [`FlowCommand`]s.  All external-call work happens in the
//! flow runner — the UI never blocks.
//!
//! # Controls
//!
//! | Control            | Action                                   | Shortcut |
//! |--------------------|------------------------------------------|----------|
//! | Source/Target      | pick languages; changing either with     |          |
//! |                    | translatable input re-runs translation   |          |
//! | ⇄ Swap             | exchange selections, then translate      |          |
//! | 🎤 Voice Input     | capture speech into the input box        | Ctrl+I   |
//! | Translate          | translate input → output                 | Ctrl+T   |
//! | 🔊 Voice Output    | speak the output text                    | Ctrl+O   |
//! | Quit               | close the window                         | Ctrl+Q   |
//!
//! While a flow is busy every trigger is disabled and a spinner with the
//! flow's status message is shown, so re-entrant invocations are impossible.

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::flow::{FlowCommand, NoticeLevel, SessionState, SharedSession};
use crate::language::Language;

// ---------------------------------------------------------------------------
// TranslatorApp
// ---------------------------------------------------------------------------

/// eframe application — the translator window.
pub struct TranslatorApp {
    /// Session shared with the flow runner.
    session: SharedSession,
    /// Send commands to the flow runner.
    command_tx: mpsc::Sender<FlowCommand>,
}

impl TranslatorApp {
    pub fn new(session: SharedSession, command_tx: mpsc::Sender<FlowCommand>) -> Self {
        Self {
            session,
            command_tx,
        }
    }

    /// Queue a command for the flow runner (non-blocking; a full queue means
    /// the user is hammering triggers faster than flows can run, and extra
    /// presses are dropped).
    fn send(&self, cmd: FlowCommand) {
        if self.command_tx.try_send(cmd).is_err() {
            log::warn!("flow command queue full, dropping {cmd:?}");
        }
    }

    // ── Shortcuts ────────────────────────────────────────────────────────

    /// Ctrl+I / Ctrl+T / Ctrl+O mirror the three action buttons; Ctrl+Q
    /// closes the window.  Action shortcuts are suppressed while busy or
    /// while a notice is open, exactly like the buttons they mirror.
    fn handle_shortcuts(&self, ctx: &egui::Context, interactive: bool) {
        let ctrl = |key: egui::Key| ctx.input(|i| i.modifiers.ctrl && i.key_pressed(key));

        if ctrl(egui::Key::Q) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        if !interactive {
            return;
        }
        if ctrl(egui::Key::I) {
            self.send(FlowCommand::VoiceInput);
        }
        if ctrl(egui::Key::T) {
            self.send(FlowCommand::Translate);
        }
        if ctrl(egui::Key::O) {
            self.send(FlowCommand::VoiceOutput);
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_header(&self, ui: &mut egui::Ui) {
        ui.heading("Voice Translator");
        ui.label(
            egui::RichText::new("Voice + text — translate between languages with a click")
                .size(12.0)
                .weak(),
        );
    }

    /// Language pickers and the swap control.  Returns `true` when the user
    /// changed either selection this frame.
    fn draw_language_row(&self, ui: &mut egui::Ui, st: &mut SessionState) -> bool {
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("Source");
            egui::ComboBox::from_id_salt("source-language")
                .selected_text(st.source.name())
                .show_ui(ui, |ui| {
                    for lang in Language::ALL {
                        if ui
                            .selectable_value(&mut st.source, lang, lang.name())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.label("Target");
            egui::ComboBox::from_id_salt("target-language")
                .selected_text(st.target.name())
                .show_ui(ui, |ui| {
                    for lang in Language::ALL {
                        if ui
                            .selectable_value(&mut st.target, lang, lang.name())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            if ui.button("⇄ Swap").clicked() {
                self.send(FlowCommand::SwapLanguages);
            }
        });

        changed
    }

    fn draw_action_row(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("🎤 Voice Input").clicked() {
                self.send(FlowCommand::VoiceInput);
            }
            if ui.button("Translate").clicked() {
                self.send(FlowCommand::Translate);
            }
            if ui.button("🔊 Voice Output").clicked() {
                self.send(FlowCommand::VoiceOutput);
            }
        });
    }

    fn draw_status_row(&self, ui: &mut egui::Ui, st: &SessionState) {
        ui.horizontal(|ui| {
            if st.phase.is_busy() {
                ui.spinner();
                ui.label(st.phase.status_message());
            } else {
                ui.label(egui::RichText::new("Ready").weak());
            }
        });
    }

    /// Modal notice window.  The main controls stay disabled while one is
    /// open; the OK button clears it.
    fn draw_notice(&self, ctx: &egui::Context, st: &mut SessionState) {
        let Some(notice) = st.notice.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let (icon, color) = match notice.level {
                    NoticeLevel::Warning => ("⚠", egui::Color32::from_rgb(230, 180, 60)),
                    NoticeLevel::Critical => ("✖", egui::Color32::from_rgb(220, 80, 80)),
                };
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(icon).color(color).size(18.0));
                    ui.label(&notice.message);
                });
                ui.add_space(6.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            st.notice = None;
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TranslatorApp {
    /// Called every frame by eframe.  Reads the session, renders, and sends
    /// commands for this frame's interactions.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut st = self.session.lock().unwrap();

        let interactive = !st.phase.is_busy() && st.notice.is_none();

        self.handle_shortcuts(ctx, interactive);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui);
            ui.add_space(8.0);

            let mut languages_changed = false;
            ui.add_enabled_ui(interactive, |ui| {
                languages_changed = self.draw_language_row(ui, &mut st);
                ui.add_space(6.0);

                ui.add(
                    egui::TextEdit::multiline(&mut st.input_text)
                        .hint_text("Enter or speak text here…")
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                self.draw_action_row(ui);
            });

            // Changing a selection with translatable input re-runs the
            // translation; identical selections never auto-trigger.
            if languages_changed
                && !st.input_text.trim().is_empty()
                && st.source != st.target
            {
                self.send(FlowCommand::Translate);
            }

            ui.add_space(6.0);
            ui.add(
                egui::TextEdit::multiline(&mut st.output_text)
                    .hint_text("Translated text will appear here…")
                    .desired_rows(5)
                    .desired_width(f32::INFINITY)
                    .interactive(false),
            );

            ui.add_space(4.0);
            self.draw_status_row(ui, &st);
        });

        self.draw_notice(ctx, &mut st);

        // Busy flows and detached playback finish off-thread; poll fast
        // while busy and slowly when idle so their results always appear.
        if st.phase.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("translator window closing");
    }
}
