//! In-memory WAV encoding for the recognizer upload.
//!
//! The recognition service accepts 16-bit PCM WAV.  [`encode_wav`] converts
//! the 16 kHz mono `f32` stream produced by the capture pipeline into a WAV
//! byte buffer without touching the filesystem.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

/// Errors from WAV encoding.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("failed to encode WAV: {0}")]
    Encode(String),
}

impl From<hound::Error> for WavError {
    fn from(e: hound::Error) -> Self {
        WavError::Encode(e.to_string())
    }
}

/// Encode mono `f32` samples in `[-1.0, 1.0]` as a 16-bit PCM WAV buffer.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample_i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
