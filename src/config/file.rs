//! Configuration file management for mrecorder.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory and written with
//! defaults on first run.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::playback::DEFAULT_POLL_INTERVAL;

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `mrecorder list-devices`
    /// - device name from `mrecorder list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Requested recording sample rate in Hz (the device rate wins if different)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Where recordings and the recordings list live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Directory new recordings are saved to (defaults to ~/Music/mrecorder)
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
    /// Text file holding the recordings list (defaults to the data directory)
    #[serde(default)]
    pub list_file: Option<PathBuf>,
}

/// Playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// How often the seek bar follows the playing position, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Interface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Locale code of the interface language
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MrecorderConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl MrecorderConfig {
    /// Loads configuration from the user's config directory, writing the
    /// defaults first if no file exists yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read or created
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, creating it with defaults if missing.
    ///
    /// # Errors
    /// - If the file cannot be read or created
    /// - If the TOML is malformed
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!(
                "Created default configuration at {}",
                config_path.display()
            );
            return Ok(config);
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: MrecorderConfig = toml::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid configuration in {}: {e}", config_path.display()))?;
        Ok(config)
    }

    fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_content = toml::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }

    /// Directory new recordings are written to.
    ///
    /// # Errors
    /// - If no default location can be determined
    pub fn recordings_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.library.recordings_dir {
            return Ok(dir.clone());
        }
        let base = dirs::audio_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(base.join("mrecorder"))
    }

    /// Location of the persisted recordings list.
    ///
    /// # Errors
    /// - If the data directory cannot be determined
    pub fn list_file(&self) -> anyhow::Result<PathBuf> {
        if let Some(file) = &self.library.list_file {
            return Ok(file.clone());
        }
        Ok(get_data_dir()?.join("recordings.txt"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.playback.poll_interval_ms.max(1))
    }
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".config").join("mrecorder").join("mrecorder.toml"))
}

/// Determines the data directory, following XDG Base Directory Specification.
///
/// Prefers XDG_DATA_HOME if set, otherwise uses ~/.local/share/mrecorder.
///
/// # Errors
/// - If home directory cannot be determined
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        if !xdg_data.is_empty() {
            return Ok(PathBuf::from(xdg_data).join("mrecorder"));
        }
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local").join("share").join("mrecorder"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("mrecorder.toml");

        let config = MrecorderConfig::load_from(&path).unwrap();
        assert_eq!(config, MrecorderConfig::default());
        assert!(path.exists());
        assert_eq!(config.playback.poll_interval_ms, 20);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mrecorder.toml");
        fs::write(
            &path,
            "[audio]\ndevice = \"USB Mic\"\n\n[library]\nlist_file = \"/tmp/list.txt\"\n",
        )
        .unwrap();

        let config = MrecorderConfig::load_from(&path).unwrap();
        assert_eq!(config.audio.device, "USB Mic");
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.list_file().unwrap(), PathBuf::from("/tmp/list.txt"));
        assert_eq!(config.ui.language, "en");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mrecorder.toml");
        fs::write(&path, "[audio\ndevice = ").unwrap();
        assert!(MrecorderConfig::load_from(&path).is_err());
    }
}
