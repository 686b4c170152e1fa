//! Terminal user interface for audio recording with a level meter.
//!
//! Provides real-time volume display, recording duration tracking, and user input handling
//! for the recording workflow.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    text::Span,
    widgets::{Paragraph, Sparkline},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use super::waveform::{resize_waveform, update_waveform};
use crate::playback::format_clock;

/// Reference level in dBFS shown as a full meter.
const REFERENCE_LEVEL_DB: f32 = -20.0;

/// User input command during recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    /// Continue recording (no key pressed)
    Continue,
    /// Stop and keep the recording (Enter key)
    Save,
    /// Stop and throw the recording away (Escape or 'q')
    Cancel,
    /// Pause/resume recording (Space key)
    TogglePause,
}

/// Elapsed recording time that does not count paused spans.
#[derive(Debug, Clone)]
pub struct PauseClock {
    started: Instant,
    paused_total: Duration,
    paused_since: Option<Instant>,
}

impl PauseClock {
    pub fn start(now: Instant) -> Self {
        Self {
            started: now,
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.paused_since.take() {
            Some(since) => self.paused_total += now.saturating_duration_since(since),
            None => self.paused_since = Some(now),
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let mut paused = self.paused_total;
        if let Some(since) = self.paused_since {
            paused += now.saturating_duration_since(since);
        }
        now.saturating_duration_since(self.started)
            .saturating_sub(paused)
    }
}

/// Loudness of the most recent 50 ms as a 0-100 meter value.
///
/// RMS is converted to dBFS and mapped linearly over the 40 dB below the
/// reference level. Silence still shows a small sliver.
pub fn level_percent(samples: &[i16], sample_rate: u32) -> u8 {
    if samples.is_empty() {
        return 0;
    }

    let window = ((sample_rate / 20) as usize).clamp(1, samples.len());
    let recent = &samples[samples.len() - window..];

    let sum_of_squares: i64 = recent.iter().map(|&x| (x as i64).pow(2)).sum();
    let rms = ((sum_of_squares / recent.len() as i64) as f32).sqrt();

    let db_fs = if rms > 0.0 {
        20.0 * (rms / 32767.0).log10()
    } else {
        -160.0
    };

    let min_db = REFERENCE_LEVEL_DB - 40.0;
    ((db_fs - min_db) / 40.0 * 100.0).clamp(4.0, 100.0) as u8
}

/// Recording screen: a scrolling level meter above a status line.
pub struct RecorderScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    level_history: Vec<u64>,
    last_sample_time: Instant,
    sample_interval: Duration,
    sample_rate: u32,
    clock: PauseClock,
    target_name: String,
    cleaned_up: bool,
}

impl RecorderScreen {
    /// Creates the screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    pub fn new(sample_rate: u32, target_name: String) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let width = terminal.size()?.width as usize;

        let now = Instant::now();
        Ok(Self {
            terminal,
            level_history: vec![0; width],
            last_sample_time: now,
            sample_interval: Duration::from_millis(50),
            sample_rate,
            clock: PauseClock::start(now),
            target_name,
            cleaned_up: false,
        })
    }

    /// Draws the meter for the latest samples.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(&mut self, samples: &[i16]) -> anyhow::Result<()> {
        let now = Instant::now();
        let paused = self.clock.is_paused();
        let width = self.terminal.size()?.width as usize;
        resize_waveform(&mut self.level_history, width);

        let level = if paused {
            0
        } else {
            level_percent(samples, self.sample_rate)
        };

        if !paused && now.duration_since(self.last_sample_time) >= self.sample_interval {
            update_waveform(&mut self.level_history, level, width);
            self.last_sample_time = now;
        }

        let elapsed = format_clock(self.clock.elapsed(now).as_millis() as u64);
        let history = &self.level_history;
        let target_name = &self.target_name;

        self.terminal.draw(|frame| {
            let area = frame.area();
            let [meter_area, footer_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

            let meter = Sparkline::default().data(history).max(100).style(
                Style::default()
                    .bg(Color::Rgb(0, 0, 0))
                    .fg(Color::Rgb(206, 224, 220)),
            );
            frame.render_widget(meter, meter_area);

            let indicator = if paused {
                Span::styled("⏸ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("● ", Style::default().fg(Color::Red))
            };

            let footer = Paragraph::new(Line::from(vec![
                indicator,
                Span::raw(elapsed),
                Span::raw(format!(" / {level}% / ")),
                Span::raw(target_name.as_str()),
                Span::styled(
                    "   ↵ save, space pause, esc/q discard",
                    Style::default().fg(Color::Rgb(100, 100, 100)),
                ),
            ]))
            .style(
                Style::default()
                    .fg(Color::Rgb(185, 207, 212))
                    .bg(Color::Rgb(0, 0, 0)),
            );
            frame.render_widget(footer, footer_area);
        })?;

        Ok(())
    }

    /// Processes user input and returns the matching recording command.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<RecordingCommand> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Enter => {
                        tracing::debug!("Enter pressed: saving recording");
                        RecordingCommand::Save
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: discarding recording");
                        RecordingCommand::Cancel
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: discarding recording");
                        RecordingCommand::Cancel
                    }
                    KeyCode::Char(' ') => {
                        self.clock.toggle(Instant::now());
                        RecordingCommand::TogglePause
                    }
                    _ => RecordingCommand::Continue,
                });
            }
        }
        Ok(RecordingCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for RecorderScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
