//! Audio capture module.
//!
//! This module handles audio input device management, PCM sample capture and
//! WAV output. Audio is captured from the configured input device, converted to
//! mono, and written as 16-bit PCM with hound.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::WavWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Records audio from a specified or default input device.
///
/// Features:
/// - Captures from a specified input device or system default at its native sample rate
/// - Converts multi-channel audio to mono by averaging channels
/// - Saves a 16-bit PCM WAV file
/// - Pause and resume support
pub struct AudioRecorder {
    /// Actual recording sample rate from device
    sample_rate: u32,
    /// Recorded audio samples (i16 PCM mono)
    samples: Arc<Mutex<Vec<i16>>>,
    /// Active audio input stream (kept alive during recording)
    stream: Option<cpal::Stream>,
    /// Whether recording is currently paused
    is_paused: Arc<Mutex<bool>>,
    /// Device name or "default" to use the system default device
    device_name: String,
}

impl AudioRecorder {
    /// Creates a new audio recorder with requested sample rate and device.
    ///
    /// The actual recording sample rate may differ based on device capabilities.
    /// Call `sample_rate()` after `start_recording()` to get the actual rate.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            is_paused: Arc::new(Mutex::new(false)),
            device_name,
        }
    }

    /// Starts recording from the configured input device.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If device configuration fails
    /// - If audio stream creation fails
    pub fn start_recording(&mut self) -> Result<()> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", device_name);

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels",
            device_sample_rate,
            num_channels
        );

        self.sample_rate = device_sample_rate;

        let samples_arc = Arc::clone(&self.samples);
        let pause_arc = Arc::clone(&self.is_paused);

        let stream = device.build_input_stream(
            &device_config.into(),
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let is_paused = pause_arc.lock().map(|p| *p).unwrap_or(false);
                if !is_paused {
                    Self::handle_audio_callback(data, &samples_arc, num_channels);
                }
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    /// Stops the input stream and writes the captured audio to `output_path`.
    ///
    /// Returns `false` when nothing was captured and no file was written.
    ///
    /// # Errors
    /// - If the output folder cannot be created
    /// - If the WAV file cannot be written
    pub fn stop_recording(&mut self, output_path: &Path) -> Result<bool> {
        self.stream = None;

        let samples = self.samples();
        if samples.is_empty() {
            tracing::warn!("Recording stopped with no samples captured");
            return Ok(false);
        }

        let duration_secs = samples.len() as f32 / self.sample_rate as f32;
        tracing::info!(
            "Recording stopped: {:.2}s ({} samples at {}Hz)",
            duration_secs,
            samples.len(),
            self.sample_rate
        );

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_wav(&samples, self.sample_rate, output_path)?;

        let file_size = std::fs::metadata(output_path)?.len();
        tracing::info!(
            "Audio saved: {} ({} bytes)",
            output_path.display(),
            file_size
        );
        Ok(true)
    }

    /// Stops the input stream and drops the captured audio.
    pub fn discard(&mut self) {
        self.stream = None;
        if let Ok(mut samples) = self.samples.lock() {
            tracing::info!("Recording discarded ({} samples)", samples.len());
            samples.clear();
        }
    }

    /// Handles incoming audio data from the audio callback.
    ///
    /// Converts multi-channel audio to mono by averaging all channels.
    fn handle_audio_callback(data: &[i16], samples_arc: &Arc<Mutex<Vec<i16>>>, num_channels: usize) {
        let Ok(mut samples) = samples_arc.lock() else {
            return;
        };
        samples.extend(downmix(data, num_channels));
    }

    /// Returns a clone of all recorded samples.
    pub fn samples(&self) -> Vec<i16> {
        self.samples.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Returns the number of recorded samples.
    pub fn sample_count(&self) -> usize {
        self.samples.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Returns the actual sample rate of the recording.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Toggles between paused and recording states.
    pub fn toggle_pause(&self) {
        if let Ok(mut paused) = self.is_paused.lock() {
            *paused = !*paused;
            if *paused {
                tracing::debug!("Recording paused");
            } else {
                tracing::debug!("Recording resumed");
            }
        }
    }
}

/// Averages interleaved frames down to one channel.
fn downmix(data: &[i16], num_channels: usize) -> Vec<i16> {
    match num_channels {
        0 | 1 => data.to_vec(),
        _ => data
            .chunks_exact(num_channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / num_channels as i32) as i16
            })
            .collect(),
    }
}

/// Writes mono 16-bit PCM samples to a WAV file.
pub fn write_wav(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    let wav_spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, wav_spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// File name for a recording started at `at`.
pub fn recording_file_name(at: DateTime<Local>) -> String {
    format!("recording-{}.wav", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Full path for a new recording in `dir`, never overwriting an existing file.
pub fn next_recording_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    let candidate = dir.join(recording_file_name(at));
    if !candidate.exists() {
        return candidate;
    }

    let stem = format!("recording-{}", at.format("%Y-%m-%d_%H-%M-%S"));
    (2..)
        .map(|n| dir.join(format!("{stem}-{n}.wav")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    if let Ok(index) = device_spec.parse::<usize>() {
        let mut devices: Vec<_> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
            .collect();

        let count = devices.len();
        if index < count {
            return Ok(devices.swap_remove(index));
        }
        return Err(anyhow!(
            "Device index {} is out of range (0-{})",
            index,
            count.saturating_sub(1)
        ));
    }

    let devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "Audio input device '{device_spec}' not found. Use 'mrecorder list-devices' to see available devices."
    ))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_downmix_averages_channels() {
        assert_eq!(downmix(&[10, 20, -4, 4], 2), vec![15, 0]);
        assert_eq!(downmix(&[3, 6, 9], 3), vec![6]);
        assert_eq!(downmix(&[1, 2, 3], 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_wav_is_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        write_wav(&[0, 100, -100, 32767], 16000, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 4);
    }

    #[test]
    fn test_next_recording_path_avoids_collisions() {
        let dir = TempDir::new().unwrap();
        let at = Local.with_ymd_and_hms(2026, 10, 18, 9, 5, 3).unwrap();

        let first = next_recording_path(dir.path(), at);
        assert_eq!(first, dir.path().join("recording-2026-10-18_09-05-03.wav"));

        std::fs::write(&first, b"").unwrap();
        let second = next_recording_path(dir.path(), at);
        assert_eq!(second, dir.path().join("recording-2026-10-18_09-05-03-2.wav"));
    }
}
