//! Playback and seek controller.
//!
//! Drives one audio session through play, pause, stop, step and seek,
//! keeping a [`SeekBar`] in sync through a [`PollTimer`]. All methods run on
//! the UI loop; nothing here blocks or spawns threads. Failures of the audio
//! handle are logged and reported as `false`, only opening a file returns an
//! error to the caller.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::backend::{AudioBackend, AudioSession, OpenError};
use super::seek_bar::SeekBar;
use super::timer::PollTimer;

/// Playback state of the open recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Paused,
    Playing,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Paused => write!(f, "paused"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

/// Notifications for the UI, drained after each input or tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Opened { path: PathBuf, duration: Duration },
    Closed,
    StatusChanged(PlaybackStatus),
    OffsetChanged(Duration),
}

/// The live binding to the selected recording.
struct Session<S> {
    path: PathBuf,
    handle: S,
}

/// Owns the current session and its play state.
pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    session: Option<Session<B::Session>>,
    status: PlaybackStatus,
    timer: PollTimer,
    seek_bar: SeekBar,
    /// Status captured when the seek bar handle was grabbed
    status_before_seek: Option<PlaybackStatus>,
    events: VecDeque<PlaybackEvent>,
}

impl<B: AudioBackend> PlaybackController<B> {
    pub fn new(backend: B, poll_interval: Duration) -> Self {
        Self {
            backend,
            session: None,
            status: PlaybackStatus::Stopped,
            timer: PollTimer::new(poll_interval),
            seek_bar: SeekBar::default(),
            status_before_seek: None,
            events: VecDeque::new(),
        }
    }

    /// Closes the current session and opens `path`, paused at zero.
    ///
    /// # Errors
    /// - `OpenError::Missing` if the file is gone
    /// - `OpenError::Corrupt` if it cannot be decoded
    ///
    /// On error no session is left open. The caller decides whether to offer
    /// removing or deleting the entry; nothing is retried.
    pub fn select(&mut self, path: &Path) -> Result<(), OpenError> {
        self.deselect();

        let handle = match self.backend.open(path) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", path.display(), e);
                return Err(e);
            }
        };

        let duration = handle.duration();
        self.seek_bar.set_range(duration_ms(duration));
        self.session = Some(Session {
            path: path.to_path_buf(),
            handle,
        });
        self.events.push_back(PlaybackEvent::Opened {
            path: path.to_path_buf(),
            duration,
        });
        self.set_status(PlaybackStatus::Paused);

        tracing::info!(
            "Selected {} ({} ms)",
            path.display(),
            duration.as_millis()
        );
        Ok(())
    }

    /// Releases the current session, if any.
    pub fn deselect(&mut self) {
        self.timer.stop();
        self.status_before_seek = None;
        if let Some(session) = self.session.take() {
            tracing::debug!("Closed session for {}", session.path.display());
            self.seek_bar.set_range(0);
            self.events.push_back(PlaybackEvent::Closed);
        }
        self.set_status(PlaybackStatus::Stopped);
    }

    /// Starts playback, or pauses it when already playing.
    pub fn play(&mut self) -> bool {
        if self.status == PlaybackStatus::Playing {
            return self.pause();
        }

        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if let Err(e) = session.handle.play() {
            tracing::warn!("Failed to start playback of {}: {}", session.path.display(), e);
            return false;
        }

        self.timer.start(Instant::now());
        self.set_status(PlaybackStatus::Playing);
        true
    }

    /// Pauses playback, keeping the offset. Does nothing unless playing.
    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        session.handle.pause();
        self.timer.stop();
        self.set_status(PlaybackStatus::Paused);
        true
    }

    /// Stops playback and rewinds to zero.
    pub fn stop(&mut self) -> bool {
        self.timer.stop();
        self.status_before_seek = None;

        let mut lost = false;
        let had_session = match self.session.as_mut() {
            Some(session) => {
                session.handle.pause();
                if let Err(e) = session.handle.set_offset(Duration::ZERO) {
                    // A fresh handle always starts at zero
                    tracing::warn!("Failed to rewind {}, reopening: {}", session.path.display(), e);
                    match self.backend.open(&session.path) {
                        Ok(handle) => session.handle = handle,
                        Err(e) => {
                            tracing::warn!("Failed to reopen {}: {}", session.path.display(), e);
                            lost = true;
                        }
                    }
                }
                true
            }
            None => false,
        };

        if lost {
            self.deselect();
            return true;
        }

        self.seek_bar.set_dragging(false);
        self.seek_bar.set_value(0);
        if had_session {
            self.events
                .push_back(PlaybackEvent::OffsetChanged(Duration::ZERO));
        }
        self.set_status(PlaybackStatus::Stopped);
        had_session
    }

    /// Moves back by one tick, stopping when that would reach zero.
    pub fn step_back(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }

        let offset = self.current_offset_ms();
        let step = self.tick_ms();

        if offset > step {
            self.commit_offset(offset - step);
        } else {
            self.stop();
        }

        self.refresh();
        true
    }

    /// Moves forward by one tick, stopping when that would reach the end.
    pub fn step_forward(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }

        let offset = self.current_offset_ms();
        let step = self.tick_ms();

        if offset + step < self.duration_ms() {
            self.commit_offset(offset + step);
        } else {
            self.stop();
        }

        self.refresh();
        true
    }

    /// Grabs the seek bar handle, pausing audio until it is released.
    ///
    /// The status reported by [`status`](Self::status) is left as it was, so
    /// the UI keeps showing what will resume on release.
    pub fn press_seek_bar(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.status_before_seek = Some(self.status);
        if self.status == PlaybackStatus::Playing {
            session.handle.pause();
            self.timer.stop();
        }
        self.seek_bar.set_dragging(true);
    }

    /// Moves the held handle. Only the displayed time changes.
    pub fn drag_seek_bar(&mut self, ms: u64) -> String {
        if self.seek_bar.is_dragging() {
            self.seek_bar.set_value(ms);
        }
        self.seek_bar.label()
    }

    /// Releases the handle, seeking to it and resuming if it was playing.
    pub fn release_seek_bar(&mut self) {
        if !self.seek_bar.is_dragging() {
            return;
        }
        self.seek_bar.set_dragging(false);

        let target = self.seek_bar.value();
        self.commit_offset(target);

        if self.status_before_seek.take() == Some(PlaybackStatus::Playing) {
            if let Some(session) = self.session.as_mut() {
                match session.handle.play() {
                    Ok(()) => self.timer.start(Instant::now()),
                    Err(e) => {
                        tracing::warn!("Failed to resume {}: {}", session.path.display(), e);
                        session.handle.pause();
                        self.set_status(PlaybackStatus::Paused);
                    }
                }
            }
        }
    }

    /// Click on the bar outside the handle: seek there immediately.
    pub fn jump_to(&mut self, ms: u64) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.seek_bar.set_value(ms);
        let target = self.seek_bar.value();
        self.commit_offset(target)
    }

    /// Seeks to `ms`, keeping the play state.
    pub fn seek_to(&mut self, ms: u64) -> bool {
        self.jump_to(ms)
    }

    /// Drives the poll timer. Returns `true` when it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire(now) {
            return false;
        }
        self.refresh();
        true
    }

    /// Pushes the handle position to the seek bar and detects end of file.
    fn refresh(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let finished = session.handle.is_finished();
        let offset = session.handle.offset();

        if !self.seek_bar.is_dragging() {
            self.seek_bar.set_value(duration_ms(offset));
        }
        self.events.push_back(PlaybackEvent::OffsetChanged(offset));

        if finished {
            tracing::debug!("Playback reached end of {}", session.path.display());
            self.stop();
        }
    }

    fn commit_offset(&mut self, ms: u64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let offset = Duration::from_millis(ms);
        if let Err(e) = session.handle.set_offset(offset) {
            tracing::warn!("Failed to seek {}: {}", session.path.display(), e);
            return false;
        }

        self.seek_bar.set_value(ms);
        self.events.push_back(PlaybackEvent::OffsetChanged(offset));
        if self.status == PlaybackStatus::Stopped && ms > 0 {
            self.set_status(PlaybackStatus::Paused);
        }
        true
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            tracing::debug!("Playback status: {} -> {}", self.status, status);
            self.status = status;
            self.events.push_back(PlaybackEvent::StatusChanged(status));
        }
    }

    /// One step of seek granularity: a hundredth of the length, rounded up.
    pub fn tick_ms(&self) -> u64 {
        self.duration_ms().div_ceil(100)
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_offset_ms(&self) -> u64 {
        self.session
            .as_ref()
            .map(|session| duration_ms(session.handle.offset()))
            .unwrap_or(0)
    }

    pub fn duration_ms(&self) -> u64 {
        self.session
            .as_ref()
            .map(|session| duration_ms(session.handle.duration()))
            .unwrap_or(0)
    }

    pub fn seek_bar(&self) -> &SeekBar {
        &self.seek_bar
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|session| session.path.as_path())
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_running()
    }

    pub fn poll_interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Time until the next poll is due, `None` when not polling.
    pub fn next_poll_in(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Takes all pending notifications.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.events.drain(..).collect()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
