//! Recording new audio into the library.
//!
//! Provides audio capture, the level meter screen, and user interaction handling
//! for the recording workflow.

pub mod audio;
pub mod ui;
pub mod waveform;

pub use audio::{next_recording_path, AudioRecorder};
pub use ui::{RecorderScreen, RecordingCommand};
