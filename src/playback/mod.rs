//! Playback of recordings.
//!
//! A single controller owns at most one open session and keeps a seek bar in
//! sync with it through a poll timer running on the UI loop.

pub mod backend;
pub mod controller;
pub mod rodio_backend;
pub mod seek_bar;
pub mod timer;

pub use backend::{AudioBackend, OpenError};
pub use controller::{PlaybackController, PlaybackEvent, PlaybackStatus};
pub use rodio_backend::{probe, RodioBackend};
pub use seek_bar::format_clock;
pub use timer::DEFAULT_POLL_INTERVAL;
