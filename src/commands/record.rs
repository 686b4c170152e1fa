//! Recording a new take.
//!
//! Shows the level meter while capturing and, when saved, writes the WAV into
//! the recordings directory and adds it to the list. Supports an external save
//! trigger via the SIGUSR1 signal.

use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::commands::load_config_or_show;
use crate::library::RecordingsList;
use crate::manager::state::display_name;
use crate::recording::{next_recording_path, AudioRecorder, RecorderScreen, RecordingCommand};
use crate::ui::ErrorScreen;

/// Records from the configured input device until saved or discarded.
///
/// Prints the path of the saved file on stdout.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the input device cannot be opened
/// - If the recording or the list cannot be written
pub async fn handle_record() -> Result<(), anyhow::Error> {
    tracing::info!("=== mrecorder Recorder Started ===");

    let config = load_config_or_show()?;
    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz",
        config.audio.device,
        config.audio.sample_rate
    );

    let output_path = next_recording_path(&config.recordings_dir()?, Local::now());
    let mut audio_recorder =
        AudioRecorder::new(config.audio.sample_rate, config.audio.device.clone());

    if let Err(e) = audio_recorder.start_recording() {
        tracing::error!("Failed to start recording: {}", e);
        let error_message = format!(
            "Recording Error:\n\n{e}\n\nPlease check your audio configuration and try again."
        );
        let mut error_screen = ErrorScreen::new()?;
        error_screen.show_error(&error_message)?;
        error_screen.cleanup()?;
        return Err(e);
    }

    let sample_rate = audio_recorder.sample_rate();
    let mut screen = RecorderScreen::new(sample_rate, display_name(&output_path))
        .map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;

    let save_requested = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&save_requested))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    tracing::debug!("Entering recording loop. Press 'Enter' to save or 'Escape'/'q' to discard.");
    let mut frame_count = 0u64;

    let save = loop {
        if save_requested.load(Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: saving via external trigger");
            break true;
        }

        match screen.handle_input() {
            Ok(RecordingCommand::Continue) => {
                frame_count += 1;
                if frame_count.is_multiple_of(60) {
                    let seconds = audio_recorder.sample_count() as f32 / sample_rate as f32;
                    tracing::debug!("Recording: {:.1}s recorded", seconds);
                }
            }
            Ok(RecordingCommand::TogglePause) => {
                audio_recorder.toggle_pause();
            }
            Ok(RecordingCommand::Save) => break true,
            Ok(RecordingCommand::Cancel) => break false,
            Err(e) => {
                tracing::error!("Input handling error: {}", e);
                audio_recorder.discard();
                return Err(anyhow::anyhow!("Input handling error: {e}"));
            }
        }

        let samples = audio_recorder.samples();
        screen
            .render(&samples)
            .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;
    };

    screen
        .cleanup()
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;

    if !save {
        audio_recorder.discard();
        tracing::info!("=== mrecorder Recorder Exited Without Saving ===");
        return Ok(());
    }

    if !audio_recorder.stop_recording(&output_path)? {
        eprintln!("Nothing was recorded.");
        return Ok(());
    }

    let mut list = RecordingsList::load(config.list_file()?)?;
    list.add(&output_path);
    list.save()?;

    println!("{}", output_path.display());
    tracing::info!("=== mrecorder Recorder Exited Successfully ===");
    Ok(())
}
