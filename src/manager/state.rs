//! State and key handling of the recordings manager.
//!
//! Everything here is independent of the terminal so it can be driven from
//! tests; the screen in [`super::ui`] only draws it and feeds it events.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::library::{self, files, import::normalize_input, LibraryError, ListEvent, RecordingsList};
use crate::playback::{AudioBackend, OpenError, PlaybackController, PlaybackEvent};

/// Distance covered by Shift+arrow seeks.
pub const SEEK_JUMP_MS: u64 = 5_000;

/// Text entry requested from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Add,
    Rename,
    Move,
}

impl Prompt {
    pub fn title(self) -> &'static str {
        match self {
            Self::Add => " Add recording (path) ",
            Self::Rename => " Rename to ",
            Self::Move => " Move to folder ",
        }
    }
}

/// Yes/no question pending an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    Clear,
    Delete(PathBuf),
    DeleteAll,
    RemoveMissing(PathBuf),
    DeleteCorrupt(PathBuf),
    Overwrite { path: PathBuf, dest_dir: PathBuf },
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Self::Clear => "Remove every recording from the list? Files are kept.".to_string(),
            Self::Delete(path) => format!("Delete {} from disk?", display_name(path)),
            Self::DeleteAll => "Delete every listed recording from disk?".to_string(),
            Self::RemoveMissing(path) => format!(
                "This file doesn't exist anymore: {}\nRemove it from the list?",
                path.display()
            ),
            Self::DeleteCorrupt(path) => format!(
                "Impossible to load {}, it must be corrupted.\nDelete it?",
                path.display()
            ),
            Self::Overwrite { path, dest_dir } => format!(
                "{} already exists in {}. Replace it?",
                display_name(path),
                dest_dir.display()
            ),
        }
    }
}

/// What the screen is currently showing on top of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompt(Prompt),
    Confirm(Confirm),
    Notice(String),
    Properties(String),
}

/// File name shown for an entry.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Recordings list and player bound together with the manager's UI state.
pub struct ManagerState<B: AudioBackend> {
    list: RecordingsList,
    player: PlaybackController<B>,
    /// Position of the highlighted row in the sorted view
    selected: Option<usize>,
    mode: Mode,
    input: Input,
    /// Screen cells occupied by the seek bar at the last draw
    seek_area: Option<Rect>,
    redraw: bool,
    /// Player offset shown by the last draw
    drawn_offset: Duration,
}

impl<B: AudioBackend> ManagerState<B> {
    /// Binds `list` and `player`, opening the first entry if any.
    pub fn new(list: RecordingsList, player: PlaybackController<B>) -> Self {
        let mut state = Self {
            selected: if list.is_empty() { None } else { Some(0) },
            list,
            player,
            mode: Mode::Normal,
            input: Input::default(),
            seek_area: None,
            redraw: true,
            drawn_offset: Duration::ZERO,
        };
        state.select_current();
        state.sync();
        state
    }

    pub fn list(&self) -> &RecordingsList {
        &self.list
    }

    pub fn player(&self) -> &PlaybackController<B> {
        &self.player
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_seek_area(&mut self, area: Rect) {
        self.seek_area = Some(area);
    }

    /// Whether anything changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Gives the list back, closing the player.
    pub fn into_list(mut self) -> RecordingsList {
        self.player.deselect();
        self.list
    }

    /// Index into the list of the highlighted entry.
    pub fn selected_index(&self) -> Option<usize> {
        let position = self.selected?;
        self.list
            .sorted_view()
            .get(position)
            .map(|(index, _)| *index)
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_index()
            .and_then(|index| self.list.get(index))
            .map(Path::to_path_buf)
    }

    /// How long the event loop may wait for input.
    pub fn poll_wait(&self) -> Duration {
        self.player
            .next_poll_in(Instant::now())
            .unwrap_or(Duration::from_millis(250))
    }

    /// Drives the playback timer.
    pub fn tick(&mut self, now: Instant) {
        if self.player.tick(now) {
            self.sync();
        }
    }

    /// Handles a key press. Returns `true` when the manager should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.redraw = true;
        let quit = match self.mode.clone() {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Prompt(prompt) => {
                self.handle_prompt_key(prompt, key);
                false
            }
            Mode::Confirm(confirm) => {
                self.handle_confirm_key(confirm, key);
                false
            }
            Mode::Notice(_) | Mode::Properties(_) => {
                self.mode = Mode::Normal;
                false
            }
        };
        self.sync();
        quit
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char(' ') => {
                self.player.play();
            }
            KeyCode::Char('s') => {
                self.player.stop();
            }
            KeyCode::Left if shift => {
                let target = self.player.current_offset_ms().saturating_sub(SEEK_JUMP_MS);
                self.player.seek_to(target);
            }
            KeyCode::Right if shift => {
                let target = self.player.current_offset_ms() + SEEK_JUMP_MS;
                self.player.seek_to(target.min(self.player.duration_ms()));
            }
            KeyCode::Left => {
                self.player.step_back();
            }
            KeyCode::Right => {
                self.player.step_forward();
            }
            KeyCode::Char('a') => self.open_prompt(Prompt::Add, String::new()),
            KeyCode::Char('r') => {
                if let Some(path) = self.selected_path() {
                    let stem = path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().to_string())
                        .unwrap_or_default();
                    self.open_prompt(Prompt::Rename, stem);
                }
            }
            KeyCode::Char('m') => {
                if let Some(path) = self.selected_path() {
                    let folder = path
                        .parent()
                        .map(|parent| parent.display().to_string())
                        .unwrap_or_default();
                    self.open_prompt(Prompt::Move, folder);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('c') => {
                if !self.list.is_empty() {
                    self.mode = Mode::Confirm(Confirm::Clear);
                }
            }
            KeyCode::Char('d') => {
                if let Some(path) = self.selected_path() {
                    self.mode = Mode::Confirm(Confirm::Delete(path));
                }
            }
            KeyCode::Char('D') => {
                if !self.list.is_empty() {
                    self.mode = Mode::Confirm(Confirm::DeleteAll);
                }
            }
            KeyCode::Char('i') => self.show_properties(),
            KeyCode::Char('o') => {
                if let Some(path) = self.selected_path() {
                    if let Err(e) = files::open_containing_folder(&path) {
                        self.notice(e.to_string());
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn handle_prompt_key(&mut self, prompt: Prompt, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let value = self.input.value().to_string();
                self.mode = Mode::Normal;
                self.input.reset();
                self.submit_prompt(prompt, &value);
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.reset();
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_confirm_key(&mut self, confirm: Confirm, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.apply_confirm(confirm);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    /// Handles mouse input: wheel scrolls the list, the left button drives
    /// the seek bar.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        self.redraw = true;

        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(area) = self.seek_area else {
                    return;
                };
                if !contains(area, mouse.column, mouse.row) {
                    return;
                }
                let column = mouse.column - area.x;
                let handle = self.player.seek_bar().handle_column(area.width);
                if column.abs_diff(handle) <= 1 {
                    self.player.press_seek_bar();
                } else {
                    let target = self.player.seek_bar().value_at(column, area.width);
                    self.player.jump_to(target);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(area) = self.seek_area {
                    if self.player.seek_bar().is_dragging() {
                        let column = mouse.column.saturating_sub(area.x);
                        let target = self.player.seek_bar().value_at(column, area.width);
                        self.player.drag_seek_bar(target);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.player.release_seek_bar();
            }
            _ => {}
        }
        self.sync();
    }

    fn open_prompt(&mut self, prompt: Prompt, initial: String) {
        self.input = Input::new(initial);
        self.mode = Mode::Prompt(prompt);
    }

    fn notice(&mut self, message: String) {
        tracing::debug!("Notice: {}", message);
        self.mode = Mode::Notice(message);
    }

    /// Moves the highlight by `delta` rows and opens the new entry.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        if Some(next) != self.selected {
            self.selected = Some(next);
            self.select_current();
        }
    }

    /// Opens the highlighted entry in the player, or asks what to do with
    /// it when it cannot be played.
    fn select_current(&mut self) {
        let Some(path) = self.selected_path() else {
            self.player.deselect();
            return;
        };
        if self.player.current_path() == Some(path.as_path()) {
            return;
        }

        match self.player.select(&path) {
            Ok(()) => {}
            Err(OpenError::Missing(path)) => {
                self.mode = Mode::Confirm(Confirm::RemoveMissing(path));
            }
            Err(OpenError::Corrupt { path, .. }) => {
                self.mode = Mode::Confirm(Confirm::DeleteCorrupt(path));
            }
            Err(e @ OpenError::Device(_)) => self.notice(e.to_string()),
        }
    }

    /// Closes the player if it holds `path`, so the file can be touched.
    fn release(&mut self, path: &Path) {
        if self.player.current_path() == Some(path) {
            self.player.deselect();
        }
    }

    /// Highlights `path` if it is listed.
    fn highlight(&mut self, path: &Path) {
        if let Some(position) = self
            .list
            .sorted_view()
            .iter()
            .position(|(_, entry)| *entry == path)
        {
            self.selected = Some(position);
        }
    }

    fn remove_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Some(path) = self.list.remove(index) {
                self.release(&path);
                tracing::info!("Removed {} from the list", path.display());
            }
        }
    }

    fn show_properties(&mut self) {
        let Some(path) = self.selected_path() else {
            return;
        };
        match files::properties(&path) {
            Ok(properties) => self.mode = Mode::Properties(properties.to_string()),
            Err(e) => self.notice(e.to_string()),
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt, value: &str) {
        match prompt {
            Prompt::Add => {
                if value.trim().is_empty() {
                    return;
                }
                let report = library::import(&mut self.list, [normalize_input(value)]);
                if let Some(added) = report.added.first() {
                    let added = added.clone();
                    self.highlight(&added);
                    self.select_current();
                } else if let Some((_, e)) = report.rejected.first() {
                    self.notice(e.to_string());
                }
            }
            Prompt::Rename => {
                let Some(index) = self.selected_index() else {
                    return;
                };
                let Some(path) = self.selected_path() else {
                    return;
                };
                self.release(&path);
                match files::rename(&mut self.list, index, value) {
                    Ok(renamed) => {
                        self.highlight(&renamed);
                        self.select_current();
                    }
                    Err(e) => {
                        self.select_current();
                        self.notice(e.to_string());
                    }
                }
            }
            Prompt::Move => {
                let Some(path) = self.selected_path() else {
                    return;
                };
                self.move_selected(path, normalize_input(value), false);
            }
        }
    }

    fn move_selected(&mut self, path: PathBuf, dest_dir: PathBuf, overwrite: bool) {
        let Some(index) = self.list.position(&path) else {
            return;
        };
        self.release(&path);
        match files::move_to(&mut self.list, index, &dest_dir, overwrite) {
            Ok(moved) => {
                self.highlight(&moved);
                self.select_current();
            }
            Err(LibraryError::AlreadyExists(_)) => {
                self.select_current();
                self.mode = Mode::Confirm(Confirm::Overwrite { path, dest_dir });
            }
            Err(e) => {
                self.select_current();
                self.notice(e.to_string());
            }
        }
    }

    fn delete_path(&mut self, path: &Path) {
        let Some(index) = self.list.position(path) else {
            return;
        };
        self.release(path);
        if let Err(e) = files::delete(&mut self.list, index) {
            self.notice(e.to_string());
        }
    }

    fn apply_confirm(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::Clear => {
                self.player.deselect();
                self.list.clear();
            }
            Confirm::Delete(path) | Confirm::DeleteCorrupt(path) => self.delete_path(&path),
            Confirm::DeleteAll => {
                self.player.deselect();
                let report = files::delete_all(&mut self.list);
                if !report.failed.is_empty() {
                    let failed: Vec<String> = report
                        .failed
                        .iter()
                        .map(|(_, e)| e.to_string())
                        .collect();
                    self.notice(format!(
                        "{} file(s) could not be deleted:\n{}",
                        failed.len(),
                        failed.join("\n")
                    ));
                }
            }
            Confirm::RemoveMissing(path) => {
                self.list.remove_path(&path);
            }
            Confirm::Overwrite { path, dest_dir } => self.move_selected(path, dest_dir, true),
        }
    }

    /// Reacts to queued list and player notifications.
    fn sync(&mut self) {
        let mut list_changed = false;
        for event in self.list.drain_events() {
            match event {
                ListEvent::Modified => list_changed = true,
            }
        }

        if list_changed {
            self.redraw = true;
            self.selected = match (self.list.len(), self.selected) {
                (0, _) => None,
                (len, Some(position)) => Some(position.min(len - 1)),
                (_, None) => Some(0),
            };
            // Only open the new highlight when nothing else is asked of the user.
            if self.mode == Mode::Normal {
                self.select_current();
            }
        }

        for event in self.player.drain_events() {
            match event {
                PlaybackEvent::Opened { path, duration } => {
                    tracing::debug!("Player opened {} ({:?})", path.display(), duration);
                    self.drawn_offset = Duration::ZERO;
                    self.redraw = true;
                }
                PlaybackEvent::Closed => {
                    self.drawn_offset = Duration::ZERO;
                    self.redraw = true;
                }
                PlaybackEvent::StatusChanged(status) => {
                    tracing::trace!("Player status {}", status);
                    self.redraw = true;
                }
                PlaybackEvent::OffsetChanged(offset) => {
                    if offset != self.drawn_offset {
                        self.drawn_offset = offset;
                        self.redraw = true;
                    }
                }
            }
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::backend::{AudioSession, PlaybackError};
    use crate::playback::PlaybackStatus;
    use ratatui::crossterm::event::KeyEventKind;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Opens any existing file as ten seconds of audio, unless it contains
    /// the word "corrupt".
    struct FileBackend;

    /// Advances a quarter second each time the offset is read while playing.
    struct FileSession {
        offset: Cell<Duration>,
        playing: bool,
    }

    impl AudioSession for FileSession {
        fn duration(&self) -> Duration {
            Duration::from_secs(10)
        }
        fn offset(&self) -> Duration {
            if self.playing {
                self.offset.set(self.offset.get() + Duration::from_millis(250));
            }
            self.offset.get()
        }
        fn set_offset(&mut self, offset: Duration) -> Result<(), PlaybackError> {
            self.offset.set(offset);
            Ok(())
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn is_finished(&self) -> bool {
            false
        }
    }

    impl AudioBackend for FileBackend {
        type Session = FileSession;

        fn open(&self, path: &Path) -> Result<FileSession, OpenError> {
            let content = fs::read(path).map_err(|_| OpenError::Missing(path.to_path_buf()))?;
            if content == b"corrupt" {
                return Err(OpenError::Corrupt {
                    path: path.to_path_buf(),
                    reason: "bad header".to_string(),
                });
            }
            Ok(FileSession {
                offset: Cell::new(Duration::ZERO),
                playing: false,
            })
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn manager_with(dir: &Path, names: &[&str]) -> ManagerState<FileBackend> {
        let mut list = RecordingsList::new(dir.join("recordings.txt"));
        for name in names {
            let path = dir.join(name);
            if !path.exists() {
                fs::write(&path, b"audio").unwrap();
            }
            list.add(path);
        }
        let player = PlaybackController::new(FileBackend, Duration::from_millis(20));
        ManagerState::new(list, player)
    }

    #[test]
    fn test_opens_first_sorted_entry() {
        let dir = TempDir::new().unwrap();
        let state = manager_with(dir.path(), &["b.wav", "a.wav"]);

        assert_eq!(state.selected(), Some(0));
        assert_eq!(state.player().current_path(), Some(dir.path().join("a.wav").as_path()));
        assert_eq!(state.player().status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_arrow_keys_move_selection_and_step() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav", "b.wav"]);

        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.player().current_path(), Some(dir.path().join("b.wav").as_path()));

        state.handle_key(key(KeyCode::Right));
        assert_eq!(state.player().current_offset_ms(), 100);

        state.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT));
        assert_eq!(state.player().current_offset_ms(), 5_100);

        state.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(state.player().status(), PlaybackStatus::Playing);
        state.handle_key(key(KeyCode::Char('s')));
        assert_eq!(state.player().status(), PlaybackStatus::Stopped);
        assert_eq!(state.player().current_offset_ms(), 0);
    }

    #[test]
    fn test_missing_file_prompts_for_removal() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav", "b.wav"]);
        fs::remove_file(dir.path().join("b.wav")).unwrap();

        state.handle_key(key(KeyCode::Down));
        assert_eq!(
            state.mode(),
            &Mode::Confirm(Confirm::RemoveMissing(dir.path().join("b.wav")))
        );

        state.handle_key(key(KeyCode::Char('y')));
        assert_eq!(state.list().entries(), &[dir.path().join("a.wav")]);
        assert_eq!(state.mode(), &Mode::Normal);
        assert_eq!(state.player().current_path(), Some(dir.path().join("a.wav").as_path()));
    }

    #[test]
    fn test_corrupt_file_prompt_deletes_on_yes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.flac"), b"corrupt").unwrap();
        let mut state = manager_with(dir.path(), &["bad.flac"]);

        assert!(matches!(state.mode(), Mode::Confirm(Confirm::DeleteCorrupt(_))));
        state.handle_key(key(KeyCode::Char('y')));

        assert!(state.list().is_empty());
        assert!(!dir.path().join("bad.flac").exists());
        assert!(!state.player().is_open());
    }

    #[test]
    fn test_declined_confirm_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav"]);

        state.handle_key(key(KeyCode::Char('d')));
        state.handle_key(key(KeyCode::Char('n')));

        assert_eq!(state.list().len(), 1);
        assert!(dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_rename_prompt_renames_open_file() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["take.wav"]);

        state.handle_key(key(KeyCode::Char('r')));
        assert_eq!(state.input().value(), "take");
        for _ in 0..4 {
            state.handle_key(key(KeyCode::Backspace));
        }
        for c in "final".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state.handle_key(key(KeyCode::Enter));

        let renamed = dir.path().join("final.wav");
        assert!(renamed.exists());
        assert_eq!(state.list().entries(), &[renamed.clone()]);
        assert_eq!(state.player().current_path(), Some(renamed.as_path()));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav", "b.wav"]);

        state.handle_key(key(KeyCode::Char('c')));
        assert_eq!(state.mode(), &Mode::Confirm(Confirm::Clear));
        state.handle_key(key(KeyCode::Enter));

        assert!(state.list().is_empty());
        assert_eq!(state.selected(), None);
        assert!(dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_unsupported_add_shows_notice() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &[]);
        let text = dir.path().join("notes.txt");
        fs::write(&text, b"x").unwrap();

        state.handle_key(key(KeyCode::Char('a')));
        for c in text.display().to_string().chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state.handle_key(key(KeyCode::Enter));

        assert!(matches!(state.mode(), Mode::Notice(_)));
        assert!(state.list().is_empty());

        state.handle_key(key(KeyCode::Char('z')));
        assert_eq!(state.mode(), &Mode::Normal);
    }

    #[test]
    fn test_seek_bar_mouse_press_drag_release() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav"]);
        state.set_seek_area(Rect::new(10, 5, 101, 1));

        let mouse = |kind, column| MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };

        state.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60));
        assert_eq!(state.player().current_offset_ms(), 5_000);

        state.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60));
        assert!(state.player().seek_bar().is_dragging());
        state.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 85));
        assert_eq!(state.player().current_offset_ms(), 5_000);

        state.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 85));
        assert!(!state.player().seek_bar().is_dragging());
        assert_eq!(state.player().current_offset_ms(), 7_500);
    }

    #[test]
    fn test_redraw_follows_player_offset() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &["a.wav"]);
        assert!(state.take_redraw());
        assert!(!state.take_redraw());

        state.tick(Instant::now() + Duration::from_secs(1));
        assert!(!state.take_redraw());

        state.handle_key(key(KeyCode::Char(' ')));
        assert!(state.take_redraw());

        state.tick(Instant::now() + Duration::from_secs(1));
        assert!(state.take_redraw());
        assert!(state.player().seek_bar().value() > 0);

        state.request_redraw();
        assert!(state.take_redraw());
    }

    #[test]
    fn test_quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut state = manager_with(dir.path(), &[]);
        assert!(!state.handle_key(key(KeyCode::Char('x'))));
        assert!(state.handle_key(key(KeyCode::Char('q'))));

        let mut press = key(KeyCode::Esc);
        press.kind = KeyEventKind::Press;
        assert!(state.handle_key(press));
    }
}
