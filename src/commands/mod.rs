//! Application command handlers for mrecorder.
//!
//! Each submodule handles one command line command.
//!
//! # Commands
//! - `manage`: Interactive recordings manager with playback (default)
//! - `record`: Record a new take into the library
//! - `library`: Scriptable list and file operations (add, list, remove, ...)
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod config;
pub mod library;
pub mod list_devices;
pub mod logs;
pub mod manage;
pub mod record;

pub use config::handle_config;
pub use library::{
    handle_add, handle_clear, handle_delete, handle_list, handle_move, handle_properties,
    handle_remove, handle_rename,
};
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use manage::handle_manage;
pub use record::handle_record;

use crate::config::MrecorderConfig;
use crate::ui::ErrorScreen;

/// Loads the configuration, showing a full-screen error before failing.
///
/// Used by the commands that take over the terminal.
pub(crate) fn load_config_or_show() -> anyhow::Result<MrecorderConfig> {
    match MrecorderConfig::load() {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/mrecorder/mrecorder.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            Err(anyhow::anyhow!("Configuration error: {err}"))
        }
    }
}
