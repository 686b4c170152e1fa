//! Interactive terminal UI for browsing and playing recordings.
//!
//! Shows the sorted recordings list, a seek bar for the open recording and
//! the dialogs raised by [`ManagerState`].

use anyhow::Result;
use ratatui::crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Instant;

use super::state::{display_name, ManagerState, Mode};
use crate::playback::{format_clock, AudioBackend, PlaybackStatus};

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);
const HELP_FG: Color = Color::Rgb(100, 100, 100);
const BAR_FG: Color = Color::Rgb(206, 224, 220);
const BAR_TRACK: Color = Color::Rgb(60, 60, 60);

const HELP_TEXT: &str = "↑↓ select, space play/pause, s stop, ←→ step, shift+←→ seek, a add, r rename, m move, x remove, c clear, d delete, D delete all, i info, o folder, q quit";

/// Full-screen recordings manager.
pub struct ManagerScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    list_state: ListState,
    cleaned_up: bool,
}

impl ManagerScreen {
    /// Creates the screen and enters alternate screen mode with mouse capture.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            list_state: ListState::default(),
            cleaned_up: false,
        })
    }

    /// Runs the event loop until the user quits.
    ///
    /// The player's poll timer is driven from here, so the wait for input
    /// never exceeds its interval while audio is playing.
    ///
    /// # Errors
    /// - If drawing or reading terminal events fails
    pub fn run<B: AudioBackend>(&mut self, state: &mut ManagerState<B>) -> Result<()> {
        loop {
            state.tick(Instant::now());
            if state.take_redraw() {
                self.draw(state)?;
            }

            if !event::poll(state.poll_wait())? {
                continue;
            }

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if state.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => state.handle_mouse(mouse),
                Event::Resize(_, _) => state.request_redraw(),
                _ => {}
            }
        }

        self.cleanup()
    }

    fn draw<B: AudioBackend>(&mut self, state: &mut ManagerState<B>) -> Result<()> {
        self.list_state.select(state.selected());
        let list_state = &mut self.list_state;
        let mut seek_area = Rect::default();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().fg(FG).bg(BG));
            frame.render_widget(&padding_block, area);
            let inner = padding_block.inner(area);

            let [header_area, list_area, player_area, help_area] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .areas(inner);

            frame.render_widget(
                Paragraph::new(format!("mrecorder  {} recording(s)", state.list().len()))
                    .style(Style::default().fg(FG)),
                header_area,
            );

            render_list(frame, list_area, state, list_state);
            seek_area = render_player(frame, player_area, state);

            frame.render_widget(
                Paragraph::new(HELP_TEXT)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(HELP_FG)),
                help_area,
            );

            render_overlay(frame, inner, state);
        })?;

        state.set_seek_area(seek_area);
        Ok(())
    }

    /// Cleans up terminal.
    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ManagerScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn render_list<B: AudioBackend>(
    frame: &mut Frame,
    area: Rect,
    state: &ManagerState<B>,
    list_state: &mut ListState,
) {
    let open = state.player().current_path();
    let items: Vec<ListItem> = state
        .list()
        .sorted_view()
        .into_iter()
        .map(|(_, path)| {
            let marker = if Some(path) == open { "♪ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(display_name(path)),
                Span::styled(
                    format!("  {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default()),
                    Style::default().fg(HELP_FG),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Recordings ").borders(Borders::ALL))
        .highlight_style(Style::default().bg(HIGHLIGHT_BG).fg(FG).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, area, list_state);
}

/// Draws status and seek bar, returning the cells the bar occupies.
fn render_player<B: AudioBackend>(frame: &mut Frame, area: Rect, state: &ManagerState<B>) -> Rect {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let player = state.player();
    let seek_bar = player.seek_bar();
    let icon = match player.status() {
        PlaybackStatus::Playing => "▶",
        PlaybackStatus::Paused => "⏸",
        PlaybackStatus::Stopped => "■",
    };

    let elapsed = seek_bar.label();
    let total = format_clock(seek_bar.maximum());
    let prefix = format!(" {icon} {elapsed} ");
    let suffix = format!(" {total} ");

    let [prefix_area, bar_area, suffix_area] = Layout::horizontal([
        Constraint::Length(prefix.chars().count() as u16),
        Constraint::Min(1),
        Constraint::Length(suffix.chars().count() as u16),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(prefix), prefix_area);
    frame.render_widget(Paragraph::new(suffix), suffix_area);

    if !player.is_open() {
        frame.render_widget(
            Paragraph::new("no recording selected").style(Style::default().fg(HELP_FG)),
            bar_area,
        );
        return Rect::default();
    }

    let handle = seek_bar.handle_column(bar_area.width);
    let spans: Vec<Span> = (0..bar_area.width)
        .map(|column| {
            if column == handle {
                Span::styled("●", Style::default().fg(FG))
            } else if column < handle {
                Span::styled("━", Style::default().fg(BAR_FG))
            } else {
                Span::styled("─", Style::default().fg(BAR_TRACK))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), bar_area);

    bar_area
}

fn render_overlay<B: AudioBackend>(frame: &mut Frame, area: Rect, state: &ManagerState<B>) {
    let (title, body, footer) = match state.mode() {
        Mode::Normal => return,
        Mode::Prompt(prompt) => {
            let popup = centered(area, 70, 3);
            frame.render_widget(Clear, popup);
            let block = Block::default().title(prompt.title()).borders(Borders::ALL);
            let input_inner = block.inner(popup);
            frame.render_widget(block, popup);

            let input = state.input();
            let scroll = input.visual_scroll(input_inner.width.saturating_sub(1) as usize);
            frame.render_widget(
                Paragraph::new(input.value()).scroll((0, scroll as u16)),
                input_inner,
            );
            let cursor_x = input_inner.x + (input.visual_cursor().max(scroll) - scroll) as u16;
            frame.set_cursor_position(Position::new(cursor_x, input_inner.y));
            return;
        }
        Mode::Confirm(confirm) => (" Confirm ", confirm.question(), "y yes, n no"),
        Mode::Notice(message) => (" Notice ", message.clone(), "press any key"),
        Mode::Properties(text) => (" Properties ", text.clone(), "press any key"),
    };

    let height = body.lines().count() as u16 + 4;
    let popup = centered(area, 70, height);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = body.lines().map(|line| Line::from(line.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(footer).style(Style::default().fg(HELP_FG)));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title(title).borders(Borders::ALL)),
        popup,
    );
}

/// Rectangle of `percent_x` width and `height` rows centered in `area`.
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
