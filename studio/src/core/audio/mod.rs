//! Audio primitives: waveforms, silence and output encoding.

pub mod format;
pub mod silence;
pub mod waveform;

use thiserror::Error;

pub use format::{AudioEncoder, OutputFormat, content_type_for_file};
pub use silence::{generate_silence, generate_silence_with_rng, validate_pause_range};
pub use waveform::{Waveform, concatenate};

/// Audio processing errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Invalid pause range: min={min}, max={max} (expected 0 <= min <= max)")]
    InvalidRange { min: f64, max: f64 },
    #[error("Failed to decode audio: {0}")]
    Decode(String),
    #[error("Failed to encode audio: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Audio I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => AudioError::Io(io),
            other => AudioError::Decode(other.to_string()),
        }
    }
}

pub type AudioResult<T> = Result<T, AudioError>;
