//! File operations on listed recordings.
//!
//! Each operation touches the disk first and updates the list only once the
//! disk operation succeeded, except bulk deletion which always empties the
//! list and reports the files it could not remove.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use super::{LibraryError, RecordingsList};
use crate::playback::{self, OpenError};

/// Files that could not be removed during a bulk delete.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    pub deleted: usize,
    pub failed: Vec<(PathBuf, LibraryError)>,
}

/// Facts shown in the properties dialog.
#[derive(Debug, Clone)]
pub struct RecordingProperties {
    pub path: PathBuf,
    pub created: Option<DateTime<Local>>,
    pub sample_rate: u32,
    pub channels: u16,
    pub size_bytes: u64,
    pub duration: Duration,
}

impl RecordingProperties {
    /// Size as whole megabytes from 1 MiB up, kilobytes below.
    pub fn size_label(&self) -> String {
        const MIB: u64 = 1024 * 1024;
        if self.size_bytes >= MIB {
            format!("{} MB", self.size_bytes / MIB)
        } else {
            format!("{} KB", self.size_bytes / 1024)
        }
    }

    /// Duration spelled out, e.g. "2 minutes and 1 second".
    pub fn duration_label(&self) -> String {
        spell_duration(self.duration)
    }
}

impl fmt::Display for RecordingProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name : {}", self.path.display())?;
        match self.created {
            Some(created) => writeln!(f, "Recorded on : {}", created.format("%m/%d/%Y"))?,
            None => writeln!(f, "Recorded on : unknown")?,
        }
        writeln!(f)?;
        writeln!(f, "Sample rate : {} Hz", self.sample_rate)?;
        writeln!(f, "Channels : {}", self.channels)?;
        writeln!(f, "Size : {}", self.size_label())?;
        write!(f, "Duration : {}", self.duration_label())
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

fn spell_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;

    if minutes == 0 {
        plural(seconds, "second")
    } else if seconds == 0 {
        plural(minutes, "minute")
    } else {
        format!("{} and {}", plural(minutes, "minute"), plural(seconds, "second"))
    }
}

fn entry(list: &RecordingsList, index: usize) -> Result<PathBuf, LibraryError> {
    list.get(index)
        .map(Path::to_path_buf)
        .ok_or_else(|| LibraryError::IndexOutOfRange {
            index,
            len: list.len(),
        })
}

/// Deletes the file at `index` and removes it from the list.
///
/// # Errors
/// - If the index is out of range
/// - If the file cannot be removed; the list is left unchanged
pub fn delete(list: &mut RecordingsList, index: usize) -> Result<PathBuf, LibraryError> {
    let path = entry(list, index)?;

    fs::remove_file(&path).map_err(|e| {
        tracing::warn!("Failed to delete {}: {}", path.display(), e);
        LibraryError::Io {
            path: path.clone(),
            source: e,
        }
    })?;

    list.remove(index);
    tracing::info!("Deleted recording {}", path.display());
    Ok(path)
}

/// Deletes every listed file and empties the list.
///
/// Entries leave the list even when their file could not be removed; those
/// files are returned in the report.
pub fn delete_all(list: &mut RecordingsList) -> BulkDeleteReport {
    let mut report = BulkDeleteReport::default();

    while let Some(path) = list.remove(0) {
        match fs::remove_file(&path) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!("Failed to delete {}: {}", path.display(), e);
                report.failed.push((
                    path.clone(),
                    LibraryError::Io {
                        path,
                        source: e,
                    },
                ));
            }
        }
    }

    tracing::info!(
        "Deleted all recordings ({} removed, {} failed)",
        report.deleted,
        report.failed.len()
    );
    report
}

/// Renames the file at `index` to `new_stem`, keeping folder and extension.
///
/// Leading and trailing spaces are dropped from the new name. Returns the
/// resulting path, which equals the old one when nothing changed.
///
/// # Errors
/// - If the name is empty or contains a path separator
/// - If a file with the new name already exists
/// - If the rename fails; the list is left unchanged
pub fn rename(
    list: &mut RecordingsList,
    index: usize,
    new_stem: &str,
) -> Result<PathBuf, LibraryError> {
    let path = entry(list, index)?;
    let stem = new_stem.trim_matches(' ');

    if stem.is_empty() || stem.contains('/') || stem.contains(std::path::MAIN_SEPARATOR) {
        return Err(LibraryError::InvalidName(new_stem.to_string()));
    }

    let mut file_name = stem.to_string();
    if let Some(ext) = path.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }
    let target = path.with_file_name(file_name);

    if target == path {
        return Ok(path);
    }
    if target.exists() {
        return Err(LibraryError::AlreadyExists(target));
    }

    fs::rename(&path, &target).map_err(|e| LibraryError::Io {
        path: target.clone(),
        source: e,
    })?;

    list.replace(index, &target);
    tracing::info!("Renamed {} to {}", path.display(), target.display());
    Ok(target)
}

/// Moves the file at `index` into `dest_dir`, keeping its file name.
///
/// The file is copied then the source removed, so moves across filesystems
/// work. Returns the resulting path.
///
/// # Errors
/// - If `dest_dir` is not a directory
/// - If the target exists and `overwrite` is false
/// - If the copy fails; the list is left unchanged
pub fn move_to(
    list: &mut RecordingsList,
    index: usize,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf, LibraryError> {
    let path = entry(list, index)?;

    if !dest_dir.is_dir() {
        return Err(LibraryError::Missing(dest_dir.to_path_buf()));
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| LibraryError::InvalidName(path.display().to_string()))?;
    let target = dest_dir.join(file_name);

    if same_file(&path, &target) {
        return Ok(path);
    }

    if target.exists() {
        if !overwrite {
            return Err(LibraryError::AlreadyExists(target));
        }
        fs::remove_file(&target).map_err(|e| LibraryError::Io {
            path: target.clone(),
            source: e,
        })?;
    }

    fs::copy(&path, &target).map_err(|e| LibraryError::Io {
        path: target.clone(),
        source: e,
    })?;

    list.replace(index, &target);

    if let Err(e) = fs::remove_file(&path) {
        tracing::warn!(
            "Copied {} but could not remove the original: {}",
            path.display(),
            e
        );
    }

    tracing::info!("Moved {} to {}", path.display(), dest_dir.display());
    Ok(target)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Reads the properties of an audio file.
///
/// # Errors
/// - `LibraryError::Missing` if the file is gone
/// - `LibraryError::Corrupt` if it cannot be decoded
pub fn properties(path: &Path) -> Result<RecordingProperties, LibraryError> {
    let info = playback::probe(path).map_err(|e| match e {
        OpenError::Missing(path) => LibraryError::Missing(path),
        OpenError::Corrupt { path, reason } => LibraryError::Corrupt { path, reason },
        OpenError::Device(reason) => LibraryError::Corrupt {
            path: path.to_path_buf(),
            reason,
        },
    })?;

    let metadata = fs::metadata(path).map_err(|e| LibraryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let created = metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .map(DateTime::<Local>::from);

    Ok(RecordingProperties {
        path: path.to_path_buf(),
        created,
        sample_rate: info.sample_rate,
        channels: info.channels,
        size_bytes: metadata.len(),
        duration: info.duration,
    })
}

/// Opens the folder containing `path` in the system file browser.
///
/// # Errors
/// - If the file has no parent folder
/// - If the file browser cannot be launched
pub fn open_containing_folder(path: &Path) -> Result<(), LibraryError> {
    let folder = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| LibraryError::OpenFolder(format!("{} has no folder", path.display())))?;

    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    Command::new(opener)
        .arg(folder)
        .spawn()
        .map_err(|e| LibraryError::OpenFolder(format!("{opener}: {e}")))?;

    tracing::debug!("Opened folder {} with {}", folder.display(), opener);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, seconds: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..8000 * seconds {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn list_with(dir: &Path, names: &[&str]) -> RecordingsList {
        let mut list = RecordingsList::new(dir.join("recordings.txt"));
        for name in names {
            let path = dir.join(name);
            fs::write(&path, b"audio").unwrap();
            list.add(path);
        }
        list
    }

    #[test]
    fn test_delete_removes_file_and_entry() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["a.wav", "b.wav"]);

        let deleted = delete(&mut list, 0).unwrap();
        assert!(!deleted.exists());
        assert_eq!(list.entries(), &[dir.path().join("b.wav")]);
    }

    #[test]
    fn test_failed_delete_keeps_entry() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["a.wav"]);
        fs::remove_file(dir.path().join("a.wav")).unwrap();

        assert!(matches!(delete(&mut list, 0), Err(LibraryError::Io { .. })));
        assert_eq!(list.len(), 1);
        assert!(matches!(
            delete(&mut list, 3),
            Err(LibraryError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_delete_all_empties_list_even_on_failure() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["a.wav", "b.wav", "c.wav"]);
        fs::remove_file(dir.path().join("b.wav")).unwrap();

        let report = delete_all(&mut list);
        assert!(list.is_empty());
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.path().join("b.wav"));
    }

    #[test]
    fn test_rename_keeps_folder_and_extension() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["take.ogg"]);

        let renamed = rename(&mut list, 0, "  interview  ").unwrap();
        assert_eq!(renamed, dir.path().join("interview.ogg"));
        assert!(renamed.exists());
        assert_eq!(list.get(0), Some(renamed.as_path()));
    }

    #[test]
    fn test_rename_refuses_existing_target_and_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["a.wav", "b.wav"]);

        assert!(matches!(
            rename(&mut list, 0, "b"),
            Err(LibraryError::AlreadyExists(_))
        ));
        assert!(matches!(
            rename(&mut list, 0, "   "),
            Err(LibraryError::InvalidName(_))
        ));
        assert_eq!(rename(&mut list, 0, "a").unwrap(), dir.path().join("a.wav"));
        assert!(dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_move_to_other_folder() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("archive");
        fs::create_dir(&dest).unwrap();
        let mut list = list_with(dir.path(), &["a.wav"]);

        let moved = move_to(&mut list, 0, &dest, false).unwrap();
        assert_eq!(moved, dest.join("a.wav"));
        assert!(moved.exists());
        assert!(!dir.path().join("a.wav").exists());
        assert_eq!(list.get(0), Some(moved.as_path()));
    }

    #[test]
    fn test_move_respects_overwrite_flag() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("archive");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("a.wav"), b"older").unwrap();
        let mut list = list_with(dir.path(), &["a.wav"]);

        assert!(matches!(
            move_to(&mut list, 0, &dest, false),
            Err(LibraryError::AlreadyExists(_))
        ));
        assert_eq!(list.get(0), Some(dir.path().join("a.wav").as_path()));

        move_to(&mut list, 0, &dest, true).unwrap();
        assert_eq!(fs::read(dest.join("a.wav")).unwrap(), b"audio");
    }

    #[test]
    fn test_move_over_listed_file_keeps_entries_unique() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("archive");
        fs::create_dir(&dest).unwrap();
        let mut list = list_with(dir.path(), &["x.wav"]);
        let archived = dest.join("x.wav");
        fs::write(&archived, b"older").unwrap();
        list.add(&archived);

        let moved = move_to(&mut list, 0, &dest, true).unwrap();
        assert_eq!(moved, archived);
        assert_eq!(list.entries(), &[archived.clone()]);
        assert_eq!(fs::read(&archived).unwrap(), b"audio");
        assert!(!dir.path().join("x.wav").exists());
    }

    #[test]
    fn test_move_into_same_folder_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut list = list_with(dir.path(), &["a.wav"]);
        let unchanged = move_to(&mut list, 0, dir.path(), false).unwrap();
        assert_eq!(unchanged, dir.path().join("a.wav"));
        assert!(unchanged.exists());
    }

    #[test]
    fn test_properties_of_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("speech.wav");
        write_wav(&path, 61);

        let props = properties(&path).unwrap();
        assert_eq!(props.sample_rate, 8000);
        assert_eq!(props.channels, 1);
        assert_eq!(props.duration_label(), "1 minute and 1 second");
        assert_eq!(props.size_bytes, 44 + 61 * 8000 * 2);
        assert_eq!(props.size_label(), "953 KB");
        assert!(props.to_string().starts_with("Name : "));
    }

    #[test]
    fn test_properties_of_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.wav");
        fs::write(&path, b"nope").unwrap();
        assert!(matches!(properties(&path), Err(LibraryError::Corrupt { .. })));
    }

    #[test]
    fn test_spell_duration() {
        assert_eq!(spell_duration(Duration::from_secs(1)), "1 second");
        assert_eq!(spell_duration(Duration::from_secs(45)), "45 seconds");
        assert_eq!(spell_duration(Duration::from_secs(120)), "2 minutes");
        assert_eq!(spell_duration(Duration::from_secs(62)), "1 minute and 2 seconds");
    }
}
