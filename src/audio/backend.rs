//! The decode/output collaborator boundary.
//!
//! The engine sees audio through the `Backend` trait family: a decoder is
//! opened for a path, then consumed into an output binding whose device
//! pulls frames from it on its own real-time thread. The shipped
//! implementation rides on rodio; engine tests substitute a scripted mock.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::{PlayerError, Result};

/// An opened PCM frame source with a known format.
pub trait Decoder {
    fn total_frames(&self) -> u64;
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
}

/// A decoder bound to an output device. Dropping the binding releases the
/// device and the decoder together.
pub trait Binding {
    fn start(&mut self);
    /// Synchronous: once this returns, the device no longer pulls frames.
    fn stop(&mut self);
    /// Current read position in frames. `None` when the cursor cannot be
    /// read; callers skip that poll tick.
    fn cursor_frames(&self) -> Option<u64>;
    fn seek_to_frame(&mut self, frame: u64) -> std::result::Result<(), SeekError>;
    /// Master volume, 0.0-1.0.
    fn set_master_volume(&mut self, volume: f32);
}

/// A failed reposition. Non-fatal: the engine logs it and keeps its state.
#[derive(Debug, thiserror::Error)]
#[error("seek to frame {frame} failed: {reason}")]
pub struct SeekError {
    pub frame: u64,
    pub reason: String,
}

pub trait Backend {
    type Decoder: Decoder;
    type Binding: Binding;

    fn open_decoder(&mut self, path: &Path) -> Result<Self::Decoder>;

    /// Consumes the decoder. On failure it is dropped, which is its
    /// teardown; no binding is left half-open.
    fn open_device(&mut self, decoder: Self::Decoder) -> Result<Self::Binding>;
}

/// Backend over rodio's mixer. The output stream is opened lazily on the
/// first device init and kept for the process lifetime; per-track devices
/// are sinks connected to its mixer.
pub struct RodioBackend {
    stream: Option<OutputStream>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self { stream: None }
    }
}

pub struct RodioDecoder {
    source: rodio::Decoder<BufReader<File>>,
    sample_rate: u32,
    channels: u16,
    total_frames: u64,
}

impl Decoder for RodioDecoder {
    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

pub struct RodioBinding {
    sink: Sink,
    sample_rate: u32,
}

impl Binding for RodioBinding {
    fn start(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.pause();
    }

    fn cursor_frames(&self) -> Option<u64> {
        Some(frames_in(self.sink.get_pos(), self.sample_rate))
    }

    fn seek_to_frame(&mut self, frame: u64) -> std::result::Result<(), SeekError> {
        let secs = frame as f64 / f64::from(self.sample_rate.max(1));
        self.sink
            .try_seek(Duration::from_secs_f64(secs))
            .map_err(|e| SeekError {
                frame,
                reason: e.to_string(),
            })
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }
}

impl Drop for RodioBinding {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

impl Backend for RodioBackend {
    type Decoder = RodioDecoder;
    type Binding = RodioBinding;

    fn open_decoder(&mut self, path: &Path) -> Result<RodioDecoder> {
        let file = File::open(path).map_err(|_| PlayerError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let source = rodio::Decoder::new(BufReader::new(file)).map_err(|_| {
            PlayerError::FileNotFound {
                path: path.to_path_buf(),
            }
        })?;

        let sample_rate = source.sample_rate();
        let channels = source.channels();
        // rodio decoders often cannot report a total for compressed formats;
        // the tag properties are the reliable source.
        let total_frames = probed_total_frames(path, sample_rate)
            .or_else(|| source.total_duration().map(|d| frames_in(d, sample_rate)))
            .unwrap_or(0);

        Ok(RodioDecoder {
            source,
            sample_rate,
            channels,
            total_frames,
        })
    }

    fn open_device(&mut self, decoder: RodioDecoder) -> Result<RodioBinding> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| PlayerError::DeviceInit(e.to_string()))?;
            // rodio logs to stderr when OutputStream is dropped. That's useful
            // in debugging, but noisy for a TUI app.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        let stream = match self.stream.as_ref() {
            Some(s) => s,
            None => return Err(PlayerError::DeviceInit("no output stream".to_string())),
        };

        let sink = Sink::connect_new(stream.mixer());
        sink.append(decoder.source);
        sink.pause();

        Ok(RodioBinding {
            sink,
            sample_rate: decoder.sample_rate,
        })
    }
}

fn probed_total_frames(path: &Path, sample_rate: u32) -> Option<u64> {
    let tagged = Probe::open(path).ok()?.read().ok()?;
    Some(frames_in(tagged.properties().duration(), sample_rate))
}

fn frames_in(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_secs_f64() * f64::from(sample_rate)).round() as u64
}
