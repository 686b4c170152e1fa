//! Persistent list of recordings.
//!
//! The list is a plain text file with one path per line. It is read once at
//! startup, keeping only files that still exist, and fully rewritten on exit.

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::LibraryError;

/// Notification emitted when the list contents change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    Modified,
}

/// Ordered set of recording paths backed by a text file.
#[derive(Debug)]
pub struct RecordingsList {
    /// Location of the persisted list
    list_file: PathBuf,
    /// Entries in insertion order
    entries: Vec<PathBuf>,
    /// Pending change notifications for the UI
    events: VecDeque<ListEvent>,
}

impl RecordingsList {
    /// Creates an empty list that will persist to `list_file`.
    pub fn new(list_file: impl Into<PathBuf>) -> Self {
        Self {
            list_file: list_file.into(),
            entries: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Loads the persisted list, dropping entries whose file is gone.
    ///
    /// A missing list file is not an error and yields an empty list.
    ///
    /// # Errors
    /// - If the list file exists but cannot be read
    pub fn load(list_file: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let mut list = Self::new(list_file);

        let file = match fs::File::open(&list.list_file) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No recordings list at {}, starting empty",
                    list.list_file.display()
                );
                return Ok(list);
            }
            Err(e) => {
                return Err(LibraryError::Io {
                    path: list.list_file.clone(),
                    source: e,
                })
            }
        };

        let mut dropped = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| LibraryError::Io {
                path: list.list_file.clone(),
                source: e,
            })?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let path = PathBuf::from(line);
            if path.exists() {
                list.insert_unique(path);
            } else {
                dropped += 1;
                tracing::debug!("Dropping missing recording from list: {}", line);
            }
        }

        tracing::info!(
            "Loaded {} recordings from {} ({} missing dropped)",
            list.entries.len(),
            list.list_file.display(),
            dropped
        );
        Ok(list)
    }

    /// Writes every entry, one per line, replacing the previous file content.
    ///
    /// # Errors
    /// - If the parent directory cannot be created
    /// - If the file cannot be written
    pub fn save(&self) -> Result<(), LibraryError> {
        if let Some(parent) = self.list_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| LibraryError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.to_string_lossy());
            content.push('\n');
        }

        fs::write(&self.list_file, content).map_err(|e| LibraryError::Io {
            path: self.list_file.clone(),
            source: e,
        })?;

        tracing::info!(
            "Saved {} recordings to {}",
            self.entries.len(),
            self.list_file.display()
        );
        Ok(())
    }

    /// Adds a path unless the exact same path is already listed.
    ///
    /// Returns `true` when the path was inserted.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let inserted = self.insert_unique(path.into());
        if inserted {
            self.events.push_back(ListEvent::Modified);
        }
        inserted
    }

    /// Removes the entry at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.events.push_back(ListEvent::Modified);
        Some(removed)
    }

    /// Removes the entry matching `path` exactly.
    pub fn remove_path(&mut self, path: &Path) -> Option<PathBuf> {
        let index = self.position(path)?;
        self.remove(index)
    }

    /// Replaces the path stored at `index`, keeping its position.
    ///
    /// Another entry already holding `new_path` is dropped, so entries after
    /// it shift up by one.
    pub fn replace(&mut self, index: usize, new_path: impl Into<PathBuf>) -> Option<PathBuf> {
        if index >= self.entries.len() {
            return None;
        }
        let new_path = new_path.into();

        let mut index = index;
        if let Some(other) = self.position(&new_path).filter(|&other| other != index) {
            self.entries.remove(other);
            if other < index {
                index -= 1;
            }
        }

        let old = std::mem::replace(&mut self.entries[index], new_path);
        self.events.push_back(ListEvent::Modified);
        Some(old)
    }

    /// Empties the list. Files on disk are left alone.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.events.push_back(ListEvent::Modified);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` is listed, compared as an exact string.
    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    /// Index of `path` in insertion order.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.as_os_str() == path.as_os_str())
    }

    /// Entries sorted alphabetically for display, paired with their index.
    pub fn sorted_view(&self) -> Vec<(usize, &Path)> {
        let mut view: Vec<(usize, &Path)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, path)| (index, path.as_path()))
            .collect();
        view.sort_by(|a, b| a.1.as_os_str().cmp(b.1.as_os_str()));
        view
    }

    pub fn list_file(&self) -> &Path {
        &self.list_file
    }

    /// Takes all pending change notifications.
    pub fn drain_events(&mut self) -> Vec<ListEvent> {
        self.events.drain(..).collect()
    }

    fn insert_unique(&mut self, path: PathBuf) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.entries.push(path);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_load_without_list_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let list = RecordingsList::load(dir.path().join("recordings.txt")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_load_drops_missing_files_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.wav");
        let c = touch(dir.path(), "c.ogg");
        let e = touch(dir.path(), "e.flac");
        let missing_b = dir.path().join("b.wav");
        let missing_d = dir.path().join("d.wav");

        let list_file = dir.path().join("recordings.txt");
        let content = [&a, &missing_b, &c, &missing_d, &e]
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&list_file, content).unwrap();

        let list = RecordingsList::load(&list_file).unwrap();
        assert_eq!(list.entries(), &[a, c, e]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = RecordingsList::new("unused.txt");
        assert!(list.add("/a/x.wav"));
        assert!(!list.add("/a/x.wav"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.drain_events(), vec![ListEvent::Modified]);
    }

    #[test]
    fn test_remove_signals_modified() {
        let mut list = RecordingsList::new("unused.txt");
        list.add("/a/x.wav");
        list.add("/b/y.ogg");
        list.drain_events();

        assert_eq!(list.remove(0), Some(PathBuf::from("/a/x.wav")));
        assert_eq!(list.remove(5), None);
        assert_eq!(list.entries(), &[PathBuf::from("/b/y.ogg")]);
        assert_eq!(list.drain_events(), vec![ListEvent::Modified]);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let x = touch(dir.path(), "x.wav");
        fs::create_dir(dir.path().join("b")).unwrap();
        let y = touch(&dir.path().join("b"), "y.ogg");
        let list_file = dir.path().join("state").join("recordings.txt");

        let mut list = RecordingsList::new(&list_file);
        list.add(&x);
        list.add(&y);
        list.save().unwrap();

        let reloaded = RecordingsList::load(&list_file).unwrap();
        assert_eq!(reloaded.entries(), &[x, y]);
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let list_file = dir.path().join("recordings.txt");
        fs::write(&list_file, "/old/one.wav\n/old/two.wav\n").unwrap();

        let mut list = RecordingsList::new(&list_file);
        list.add("/new/only.wav");
        list.save().unwrap();

        assert_eq!(fs::read_to_string(&list_file).unwrap(), "/new/only.wav\n");
    }

    #[test]
    fn test_sorted_view_maps_back_to_insertion_index() {
        let mut list = RecordingsList::new("unused.txt");
        list.add("/z.wav");
        list.add("/a.wav");
        let view = list.sorted_view();
        assert_eq!(view[0], (1, Path::new("/a.wav")));
        assert_eq!(view[1], (0, Path::new("/z.wav")));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut list = RecordingsList::new("unused.txt");
        list.add("/a.wav");
        list.add("/b.wav");
        list.replace(0, "/renamed.wav");
        assert_eq!(list.get(0), Some(Path::new("/renamed.wav")));
        assert_eq!(list.get(1), Some(Path::new("/b.wav")));
    }

    #[test]
    fn test_replace_with_listed_path_drops_other_entry() {
        let mut list = RecordingsList::new("unused.txt");
        list.add("/a.wav");
        list.add("/b.wav");
        list.add("/c.wav");

        assert_eq!(list.replace(2, "/a.wav"), Some(PathBuf::from("/c.wav")));
        assert_eq!(list.entries(), &[PathBuf::from("/b.wav"), PathBuf::from("/a.wav")]);

        assert_eq!(list.replace(0, "/a.wav"), Some(PathBuf::from("/b.wav")));
        assert_eq!(list.entries(), &[PathBuf::from("/a.wav")]);
        assert_eq!(list.replace(5, "/x.wav"), None);
    }
}
