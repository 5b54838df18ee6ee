//! Playback of synthesized speech via `rodio`.
//!
//! Two strategies, functionally equivalent from the caller's perspective:
//!
//! * [`play_blocking`] — decode and play on the calling thread, returning
//!   when the audio ends.  Used inside `spawn_blocking` so the flow spans
//!   the whole playback.
//! * [`play_detached`] — spawn a playback thread and hand it a one-shot
//!   completion callback.  The callback receives the playback result and is
//!   invoked exactly once, whether playback finished, failed to start, or
//!   the thread could not be spawned (the closure is dropped in that last
//!   case, which still runs any cleanup it owns).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors from audio playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The artifact file could not be opened.
    #[error("failed to open audio file: {0}")]
    Open(String),

    /// The bytes could not be decoded as audio.
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// No output device, or the device rejected the stream.
    #[error("audio output unavailable: {0}")]
    Output(String),
}

// ---------------------------------------------------------------------------
// Playback strategies
// ---------------------------------------------------------------------------

/// Play `path` to completion on the calling thread.
///
/// The file is opened before the output device so a missing artifact is
/// reported as [`PlaybackError::Open`] even on machines with no audio device.
pub fn play_blocking(path: &Path) -> Result<(), PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::Open(e.to_string()))?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

    // `_stream` must outlive the sink or playback stops immediately.
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::Output(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Output(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Play `path` on a background thread and invoke `on_complete` with the
/// result when playback reaches its terminal state.
pub fn play_detached<F>(path: PathBuf, on_complete: F)
where
    F: FnOnce(Result<(), PlaybackError>) + Send + 'static,
{
    let spawned = std::thread::Builder::new()
        .name("speech-playback".into())
        .spawn(move || {
            let result = play_blocking(&path);
            on_complete(result);
        });

    if let Err(e) = spawned {
        // The closure (and the cleanup it owns) was dropped with the failed
        // spawn; nothing further to run here.
        log::error!("failed to spawn playback thread: {e}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
