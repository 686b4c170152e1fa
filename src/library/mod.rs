//! Recordings library for mrecorder.
//!
//! Keeps the persistent list of recordings and performs the file operations
//! offered by the manager: import, rename, move, delete and properties.

pub mod files;
pub mod import;
pub mod store;

use std::path::PathBuf;

pub use import::import;
pub use store::{ListEvent, RecordingsList};

/// Errors raised by library operations.
///
/// None of these abort the application; the caller shows them to the user
/// and leaves the list untouched.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("This file doesn't exist anymore: {}", .0.display())]
    Missing(PathBuf),

    #[error("Impossible to load {}, it must be corrupted ({reason})", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Impossible to import {}, only OGG, FLAC and WAV files are supported", .0.display())]
    Unsupported(PathBuf),

    #[error("A file with the same name already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid file name: '{0}'")]
    InvalidName(String),

    #[error("Recording index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to open folder: {0}")]
    OpenFolder(String),
}
