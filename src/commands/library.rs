//! Scriptable operations on the recordings list.
//!
//! Every command loads the persisted list, applies one change, and saves it
//! back. Recording numbers are 1-based and follow the order of the list file,
//! as printed by `mrecorder list`.

use anyhow::anyhow;
use std::path::PathBuf;

use crate::config::MrecorderConfig;
use crate::library::{self, files, import::normalize_input, LibraryError, RecordingsList};

fn load_list() -> anyhow::Result<RecordingsList> {
    let config = MrecorderConfig::load()?;
    Ok(RecordingsList::load(config.list_file()?)?)
}

/// Turns a 1-based recording number into a list index.
fn to_index(list: &RecordingsList, number: usize) -> anyhow::Result<usize> {
    if number == 0 {
        return Err(anyhow!("Recording numbers start at 1"));
    }
    let index = number - 1;
    if index >= list.len() {
        return Err(LibraryError::IndexOutOfRange {
            index: number,
            len: list.len(),
        }
        .into());
    }
    Ok(index)
}

/// Imports audio files into the list.
///
/// # Errors
/// - If the list cannot be loaded or saved
/// - If no file could be imported
pub fn handle_add(paths: Vec<String>) -> anyhow::Result<()> {
    let mut list = load_list()?;
    let report = library::import(&mut list, paths.iter().map(|raw| normalize_input(raw)));

    for path in &report.added {
        println!("Added {}", path.display());
    }
    for path in &report.duplicates {
        println!("Already listed {}", path.display());
    }
    for (_, e) in &report.rejected {
        eprintln!("{e}");
    }

    list.save()?;

    if report.added.is_empty() && report.duplicates.is_empty() && !report.rejected.is_empty() {
        return Err(anyhow!("No file was imported"));
    }
    Ok(())
}

/// Prints the numbered list.
///
/// # Errors
/// - If the list cannot be loaded
pub fn handle_list() -> anyhow::Result<()> {
    let list = load_list()?;
    if list.is_empty() {
        println!("No recordings yet. Record one with 'mrecorder record'.");
        return Ok(());
    }

    let width = list.len().to_string().len();
    for (index, path) in list.entries().iter().enumerate() {
        println!("{:>width$}  {}", index + 1, path.display());
    }
    Ok(())
}

/// Removes recording `number` from the list, keeping the file.
///
/// # Errors
/// - If the number is out of range
/// - If the list cannot be loaded or saved
pub fn handle_remove(number: usize) -> anyhow::Result<()> {
    let mut list = load_list()?;
    let index = to_index(&list, number)?;
    if let Some(path) = list.remove(index) {
        println!("Removed {} from the list", path.display());
    }
    list.save()?;
    Ok(())
}

/// Empties the list, keeping the files.
///
/// # Errors
/// - If the list cannot be loaded or saved
pub fn handle_clear() -> anyhow::Result<()> {
    let mut list = load_list()?;
    let count = list.len();
    list.clear();
    list.save()?;
    println!("Removed {count} recording(s) from the list");
    Ok(())
}

/// Deletes the file of recording `number` and removes it from the list.
///
/// # Errors
/// - If the number is out of range
/// - If the file cannot be deleted
/// - If the list cannot be loaded or saved
pub fn handle_delete(number: usize) -> anyhow::Result<()> {
    let mut list = load_list()?;
    let index = to_index(&list, number)?;
    let path = files::delete(&mut list, index)?;
    list.save()?;
    println!("Deleted {}", path.display());
    Ok(())
}

/// Renames the file of recording `number`, keeping folder and extension.
///
/// # Errors
/// - If the number is out of range or the name is invalid
/// - If the rename fails
/// - If the list cannot be loaded or saved
pub fn handle_rename(number: usize, name: String) -> anyhow::Result<()> {
    let mut list = load_list()?;
    let index = to_index(&list, number)?;
    let renamed = files::rename(&mut list, index, &name)?;
    list.save()?;
    println!("Renamed to {}", renamed.display());
    Ok(())
}

/// Moves the file of recording `number` into `dest_dir`.
///
/// # Errors
/// - If the number is out of range
/// - If the target exists and `force` is not set
/// - If the move fails
/// - If the list cannot be loaded or saved
pub fn handle_move(number: usize, dest_dir: PathBuf, force: bool) -> anyhow::Result<()> {
    let mut list = load_list()?;
    let index = to_index(&list, number)?;
    let moved = match files::move_to(&mut list, index, &dest_dir, force) {
        Ok(moved) => moved,
        Err(LibraryError::AlreadyExists(target)) => {
            return Err(anyhow!(
                "{} already exists, use --force to replace it",
                target.display()
            ));
        }
        Err(e) => return Err(e.into()),
    };
    list.save()?;
    println!("Moved to {}", moved.display());
    Ok(())
}

/// Prints the properties of recording `number`.
///
/// # Errors
/// - If the number is out of range
/// - If the file is missing or cannot be decoded
pub fn handle_properties(number: usize) -> anyhow::Result<()> {
    let list = load_list()?;
    let index = to_index(&list, number)?;
    let path = list
        .get(index)
        .ok_or_else(|| anyhow!("Recording {number} not found"))?;
    println!("{}", files::properties(path)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_numbers_are_one_based() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut list = RecordingsList::new(dir.path().join("recordings.txt"));
        list.add("/rec/a.wav");
        list.add("/rec/b.wav");

        assert!(to_index(&list, 0).is_err());
        assert_eq!(to_index(&list, 1).unwrap(), 0);
        assert_eq!(to_index(&list, 2).unwrap(), 1);
        assert!(to_index(&list, 3).is_err());
    }
}
