//! Player errors.

use std::path::PathBuf;

/// Errors that can occur while opening or playing a video.
///
/// End of stream is not an error; decoders report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Could not open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Seek to {seconds:.2}s failed: {reason}")]
    Seek { seconds: f64, reason: String },

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlayerError {
    pub fn open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn seek(seconds: f64, reason: impl Into<String>) -> Self {
        Self::Seek {
            seconds,
            reason: reason.into(),
        }
    }

    /// Whether this error stems from opening the input (exit code 1 at startup).
    pub fn is_open_error(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}
