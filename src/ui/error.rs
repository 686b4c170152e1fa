//! Full-screen error display.
//!
//! Shown when a command fails while a terminal screen was expected, so the user
//! sees the reason instead of a silently closed window.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(160, 30, 30);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Red screen with a centered message, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    /// Creates a new error screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(ErrorScreen { terminal })
    }

    /// Shows `error_message` until a key is pressed.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn show_error(&mut self, error_message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                frame.render_widget(
                    Paragraph::new("").style(Style::default().bg(ERROR_BG)),
                    area,
                );

                let message_area = Rect {
                    x: area.x + area.width / 10,
                    y: area.y + area.height / 2,
                    width: area.width * 8 / 10,
                    height: area.height / 2,
                };
                let text = Text::from(vec![
                    Line::from(error_message.to_string()),
                    Line::from(""),
                    Line::from("press any key").style(Style::default().add_modifier(Modifier::DIM)),
                ]);
                frame.render_widget(
                    Paragraph::new(text)
                        .style(Style::default().fg(ERROR_FG).bg(ERROR_BG))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    message_area,
                );
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
