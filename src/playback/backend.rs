//! Seam between the playback controller and an audio library.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reasons a recording could not be opened for playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenError {
    /// The path no longer resolves on disk
    #[error("This file doesn't exist anymore: {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but the decoder refused it
    #[error("Impossible to load {}, it must be corrupted ({reason})", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The output device could not accept a new stream
    #[error("Audio output unavailable: {0}")]
    Device(String),
}

/// Failures of an already opened session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Seek failed: {0}")]
    Seek(String),

    #[error("Failed to reload audio: {0}")]
    Reload(#[from] OpenError),
}

/// One opened audio file.
pub trait AudioSession {
    /// Total length of the file.
    fn duration(&self) -> Duration;

    /// Current playing position.
    fn offset(&self) -> Duration;

    /// Moves the playing position without changing play/pause state.
    fn set_offset(&mut self, offset: Duration) -> Result<(), PlaybackError>;

    /// Starts or resumes output.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pauses output, keeping the position.
    fn pause(&mut self);

    /// Whether playback ran to the end of the file on its own.
    fn is_finished(&self) -> bool;
}

/// Opens files into sessions.
pub trait AudioBackend {
    type Session: AudioSession;

    /// Opens `path` paused at offset zero.
    fn open(&self, path: &Path) -> Result<Self::Session, OpenError>;
}
