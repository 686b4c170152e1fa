//! Importing existing audio files into the recordings list.

use std::path::{Path, PathBuf};

use super::{LibraryError, RecordingsList};

/// File extensions accepted for import, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["ogg", "flac", "wav"];

/// Outcome of importing a batch of files.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Paths newly added to the list
    pub added: Vec<PathBuf>,
    /// Paths that were already listed
    pub duplicates: Vec<PathBuf>,
    /// Paths refused, with the reason
    pub rejected: Vec<(PathBuf, LibraryError)>,
}

/// Whether the file extension is one of OGG, FLAC or WAV.
///
/// Only the extension is checked, the content is not sniffed.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Turns a dropped `file://` URL or a plain path into a path.
pub fn normalize_input(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("file://") {
        Some(rest) => PathBuf::from(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Adds every supported, existing file to the list.
///
/// Paths are made absolute so the list stays valid regardless of the
/// working directory.
pub fn import<I>(list: &mut RecordingsList, paths: I) -> ImportReport
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut report = ImportReport::default();

    for path in paths {
        if !is_supported(&path) {
            tracing::warn!("Rejected import of unsupported file: {}", path.display());
            report.rejected.push((path.clone(), LibraryError::Unsupported(path)));
            continue;
        }

        let absolute = match std::fs::canonicalize(&path) {
            Ok(absolute) => absolute,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.rejected.push((path.clone(), LibraryError::Missing(path)));
                continue;
            }
            Err(e) => {
                report
                    .rejected
                    .push((path.clone(), LibraryError::Io { path, source: e }));
                continue;
            }
        };

        if list.add(&absolute) {
            tracing::info!("Imported recording: {}", absolute.display());
            report.added.push(absolute);
        } else {
            report.duplicates.push(absolute);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_supported_ignores_case() {
        assert!(is_supported(Path::new("/music/take.WAV")));
        assert!(is_supported(Path::new("/music/take.Flac")));
        assert!(is_supported(Path::new("take.ogg")));
        assert!(!is_supported(Path::new("take.mp3")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn test_normalize_input_strips_file_scheme() {
        assert_eq!(
            normalize_input("file:///home/me/a.wav"),
            PathBuf::from("/home/me/a.wav")
        );
        assert_eq!(normalize_input(" /tmp/b.ogg \n"), PathBuf::from("/tmp/b.ogg"));
    }

    #[test]
    fn test_import_sorts_files_into_report() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("voice.wav");
        let mp3 = dir.path().join("song.mp3");
        std::fs::write(&wav, b"").unwrap();
        std::fs::write(&mp3, b"").unwrap();
        let gone = dir.path().join("gone.flac");

        let mut list = RecordingsList::new(dir.path().join("recordings.txt"));
        let report = import(&mut list, vec![wav.clone(), mp3, gone, wav.clone()]);

        let canonical = std::fs::canonicalize(&wav).unwrap();
        assert_eq!(report.added, vec![canonical.clone()]);
        assert_eq!(report.duplicates, vec![canonical]);
        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(report.rejected[0].1, LibraryError::Unsupported(_)));
        assert!(matches!(report.rejected[1].1, LibraryError::Missing(_)));
        assert_eq!(list.len(), 1);
    }
}
