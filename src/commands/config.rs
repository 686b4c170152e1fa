//! Configuration file editor command.
//!
//! Opens the mrecorder configuration file in the user's preferred editor.

use std::process::Command;

use crate::config::{get_config_path, MrecorderConfig};

/// Opens the configuration file in the user's preferred editor.
///
/// The file is written with defaults first if it does not exist yet.
/// Editors are tried in this order: $EDITOR, nano, vi.
///
/// # Errors
/// - If the existing file is malformed
/// - If no editor can be found or executed
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    if let Err(e) = MrecorderConfig::load_from(&config_path) {
        tracing::warn!("Opening invalid configuration for editing: {e}");
    }

    tracing::info!("Opening config file: {}", config_path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
            )
        })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    MrecorderConfig::load_from(&config_path)
        .map_err(|e| anyhow::anyhow!("The edited configuration is invalid: {e}"))?;

    tracing::info!("Config file edited successfully");
    Ok(())
}

/// Picks $EDITOR, then the first of nano and vi found on the PATH.
fn find_editor() -> anyhow::Result<String> {
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    ["nano", "vi"]
        .into_iter()
        .find(|editor| is_editor_available(editor))
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No editor found. Please set the $EDITOR environment variable."))
}

fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
