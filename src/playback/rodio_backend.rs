//! Audio playback through rodio.
//!
//! Decodes WAV, FLAC and Ogg Vorbis files and plays them on the default
//! output device. Each session owns a `Sink`; once the sink drains at the end
//! of the file, the decoder is re-created on demand so the recording can be
//! replayed or sought again.
//!
//! Only the WAV decoder can seek in place. FLAC and Vorbis report
//! `SeekError::NotSupported`, so for those a new decoder is opened and
//! samples are skipped up to the target.

use rodio::source::SeekError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::backend::{AudioBackend, AudioSession, OpenError, PlaybackError};

type FileDecoder = Decoder<BufReader<File>>;
type BoxedSource = Box<dyn Source<Item = i16> + Send>;

/// Basic facts about an audio file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: Duration,
}

/// Backend bound to the default audio output device.
pub struct RodioBackend {
    /// Keeps the output stream alive; dropping it silences every sink
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Opens the default output device.
    ///
    /// # Errors
    /// - If no output device is available
    pub fn new() -> Result<Self, OpenError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| OpenError::Device(e.to_string()))?;
        tracing::debug!("Audio output stream opened");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioBackend for RodioBackend {
    type Session = RodioSession;

    fn open(&self, path: &Path) -> Result<RodioSession, OpenError> {
        let decoder = open_decoder(path)?;
        let duration = match decoder.total_duration() {
            Some(duration) => duration,
            None => probe(path)?.duration,
        };

        let sink = Sink::try_new(&self.handle).map_err(|e| OpenError::Device(e.to_string()))?;
        sink.pause();
        sink.append(decoder);

        tracing::debug!(
            "Opened {} for playback ({} ms)",
            path.display(),
            duration.as_millis()
        );

        Ok(RodioSession {
            path: path.to_path_buf(),
            handle: self.handle.clone(),
            sink,
            duration,
            base: Duration::ZERO,
        })
    }
}

/// A recording loaded into a rodio sink.
pub struct RodioSession {
    path: PathBuf,
    handle: OutputStreamHandle,
    sink: Sink,
    duration: Duration,
    /// Position the current decoder started from when it was skipped ahead
    base: Duration,
}

impl RodioSession {
    /// Appends a fresh decoder when the previous one was consumed.
    fn ensure_loaded(&mut self) -> Result<(), PlaybackError> {
        if self.sink.empty() {
            let decoder = open_decoder(&self.path)?;
            self.sink.pause();
            self.sink.append(decoder);
            self.base = Duration::ZERO;
            tracing::debug!("Reloaded {} after end of stream", self.path.display());
        }
        Ok(())
    }

    /// Replaces the sink with one reading a new decoder from `offset`.
    fn reload_at(&mut self, offset: Duration) -> Result<(), PlaybackError> {
        let source = seek_or_skip(open_decoder(&self.path)?, offset)?;
        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackError::Seek(e.to_string()))?;
        let paused = self.sink.is_paused();

        sink.pause();
        sink.append(source);
        if !paused {
            sink.play();
        }

        let previous = std::mem::replace(&mut self.sink, sink);
        previous.stop();
        self.base = offset;

        tracing::debug!(
            "Reloaded {} at {} ms",
            self.path.display(),
            offset.as_millis()
        );
        Ok(())
    }
}

impl AudioSession for RodioSession {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn offset(&self) -> Duration {
        if self.sink.empty() {
            return Duration::ZERO;
        }
        (self.base + self.sink.get_pos()).min(self.duration)
    }

    fn set_offset(&mut self, offset: Duration) -> Result<(), PlaybackError> {
        let offset = offset.min(self.duration);
        self.ensure_loaded()?;

        match self.sink.try_seek(offset) {
            Ok(()) => {
                self.base = Duration::ZERO;
                Ok(())
            }
            Err(SeekError::NotSupported { .. }) => self.reload_at(offset),
            Err(e) => Err(PlaybackError::Seek(e.to_string())),
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.ensure_loaded()?;
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for RodioSession {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

/// Reads sample rate, channel count and duration of an audio file.
///
/// When the container does not report a length, the file is decoded once to
/// count its samples.
///
/// # Errors
/// - `OpenError::Missing` if the file does not exist
/// - `OpenError::Corrupt` if it cannot be decoded
pub fn probe(path: &Path) -> Result<AudioInfo, OpenError> {
    let decoder = open_decoder(path)?;
    let sample_rate = decoder.sample_rate();
    let channels = decoder.channels();

    let duration = match decoder.total_duration() {
        Some(duration) => duration,
        None => {
            let frames = decoder.count() as f64 / f64::from(channels.max(1));
            Duration::from_secs_f64(frames / f64::from(sample_rate.max(1)))
        }
    };

    Ok(AudioInfo {
        sample_rate,
        channels,
        duration,
    })
}

/// Positions `source` at `offset`, seeking when the decoder supports it and
/// skipping samples otherwise.
fn seek_or_skip<S>(mut source: S, offset: Duration) -> Result<BoxedSource, PlaybackError>
where
    S: Source<Item = i16> + Send + 'static,
{
    match source.try_seek(offset) {
        Ok(()) => Ok(Box::new(source)),
        Err(SeekError::NotSupported { .. }) => Ok(Box::new(source.skip_duration(offset))),
        Err(e) => Err(PlaybackError::Seek(e.to_string())),
    }
}

fn open_decoder(path: &Path) -> Result<FileDecoder, OpenError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => OpenError::Missing(path.to_path_buf()),
        _ => OpenError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| OpenError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames * u32::from(channels) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    /// Ramp of mono samples, each equal to its own index.
    fn write_ramp(path: &Path, sample_rate: u32, frames: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample(i as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    /// Source without seek support, like the FLAC and Vorbis decoders.
    struct Unseekable {
        next: i16,
        len: i16,
    }

    impl Iterator for Unseekable {
        type Item = i16;

        fn next(&mut self) -> Option<i16> {
            if self.next >= self.len {
                return None;
            }
            self.next += 1;
            Some(self.next - 1)
        }
    }

    impl Source for Unseekable {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            1000
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(Duration::from_millis(self.len as u64))
        }
    }

    #[test]
    fn test_seek_or_skip_seeks_wav_decoder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ramp.wav");
        write_ramp(&path, 1000, 2000);

        let mut source = seek_or_skip(open_decoder(&path).unwrap(), Duration::from_millis(500)).unwrap();
        assert_eq!(source.next(), Some(500));
    }

    #[test]
    fn test_seek_or_skip_skips_unseekable_source() {
        let mut plain = Unseekable { next: 0, len: 2000 };
        assert!(matches!(
            plain.try_seek(Duration::from_millis(10)),
            Err(SeekError::NotSupported { .. })
        ));

        let mut source =
            seek_or_skip(Unseekable { next: 0, len: 2000 }, Duration::from_millis(1500)).unwrap();
        assert_eq!(source.next(), Some(1500));
        assert_eq!(source.count(), 499);

        let mut rewound = seek_or_skip(Unseekable { next: 0, len: 2000 }, Duration::ZERO).unwrap();
        assert_eq!(rewound.next(), Some(0));
    }

    #[test]
    fn test_probe_reads_wav_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 8000, 2, 16000);

        let info = probe(&path).unwrap();
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.duration.as_millis(), 2000);
    }

    #[test]
    fn test_probe_distinguishes_missing_and_corrupt() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nothing.wav");
        assert_eq!(probe(&missing), Err(OpenError::Missing(missing.clone())));

        let garbage = dir.path().join("garbage.wav");
        std::fs::write(&garbage, b"definitely not a riff header").unwrap();
        assert!(matches!(probe(&garbage), Err(OpenError::Corrupt { .. })));
    }
}
