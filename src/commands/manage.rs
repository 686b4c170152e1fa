//! Interactive recordings manager.

use crate::commands::load_config_or_show;
use crate::library::RecordingsList;
use crate::manager::{ManagerScreen, ManagerState};
use crate::playback::{PlaybackController, RodioBackend};
use crate::ui::ErrorScreen;

/// Opens the manager on the persisted recordings list.
///
/// The list is saved when the manager closes, also when the screen failed.
///
/// # Errors
/// - If the configuration or the list file cannot be read
/// - If no audio output device is available
/// - If the terminal fails
/// - If the list cannot be saved
pub async fn handle_manage() -> Result<(), anyhow::Error> {
    tracing::info!("=== mrecorder Manager Started ===");

    let config = load_config_or_show()?;
    let list = RecordingsList::load(config.list_file()?)?;
    tracing::info!(
        "Loaded {} recording(s) from {}",
        list.len(),
        list.list_file().display()
    );

    let backend = match RodioBackend::new() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Failed to open audio output: {e}");
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&format!(
                "Playback Error:\n\n{e}\n\nPlease check your audio output device and try again."
            ))?;
            error_screen.cleanup()?;
            return Err(e.into());
        }
    };

    let player = PlaybackController::new(backend, config.poll_interval());
    let mut state = ManagerState::new(list, player);

    let result = ManagerScreen::new().and_then(|mut screen| screen.run(&mut state));

    let list = state.into_list();
    list.save()?;
    tracing::info!("Saved {} recording(s)", list.len());

    result
}
