//! Temporary speech-audio artifact with guaranteed cleanup.
//!
//! Every voice-output invocation synthesizes into a freshly named file — a
//! random token, never derived from the content, so an OS or player cache
//! keyed on the filename can never serve stale audio.  The file is removed
//! when the [`SpeechArtifact`] is dropped; single ownership makes deleting
//! twice unrepresentable, and a failed deletion is logged rather than raised.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A uniquely named MP3 file owned by one voice-output invocation.
#[derive(Debug)]
pub struct SpeechArtifact {
    path: PathBuf,
}

impl SpeechArtifact {
    /// Reserve a fresh artifact path under `dir`.
    ///
    /// Only the name is generated here; the synthesis adapter writes the
    /// actual file.
    pub fn new_unique(dir: &Path) -> Self {
        let path = dir.join(format!("speech-{}.mp3", Uuid::new_v4().simple()));
        Self { path }
    }

    /// Path the synthesis adapter should write to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpeechArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("deleted speech artifact {}", self.path.display()),
            // Synthesis may have failed before writing anything.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "failed to delete speech artifact {}: {e}",
                self.path.display()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
