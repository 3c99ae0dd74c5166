use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::backend::{BackendError, MediaBackend};

/// Audio playback through the rodio mixer. One sink at a time; `load`
/// decodes the file into a paused sink, `play` releases it.
pub struct AudioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
    fade_out: Duration,
    // Elapsed-time bookkeeping; rodio has no wall-clock position query
    // that survives pause, so we keep our own.
    started: Option<Instant>,
    accumulated: Duration,
}

impl AudioBackend {
    pub fn new(fade_out: Duration) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            volume: 0.7,
            fade_out,
            started: None,
            accumulated: Duration::ZERO,
        })
    }

    /// Step the sink down to silence before stopping, so the cut is not
    /// audible. Skipped entirely when the configured fade is zero.
    fn fade_to_silence(&self, sink: &Sink) {
        if self.fade_out.is_zero() {
            return;
        }

        let steps: u32 = 10;
        let step_duration = self.fade_out / steps;
        let volume_step = self.volume / steps as f32;

        for step in 1..=steps {
            let next = (self.volume - volume_step * step as f32).max(0.0);
            sink.set_volume(next);
            std::thread::sleep(step_duration);
        }
        sink.set_volume(0.0);
    }
}

impl MediaBackend for AudioBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        self.stop();

        let sink = Sink::try_new(&self.stream_handle)?;

        let file = File::open(path).map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|source| BackendError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        sink.set_volume(self.volume);
        sink.append(source);
        // Armed but silent until play()
        sink.pause();

        self.sink = Some(sink);
        self.started = None;
        self.accumulated = Duration::ZERO;
        debug!(path = %path.display(), "audio track loaded");
        Ok(())
    }

    fn play(&mut self) -> Result<(), BackendError> {
        if let Some(sink) = &self.sink {
            sink.play();
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.started = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            self.fade_to_silence(&sink);
            sink.stop();
        }
        self.started = None;
        self.accumulated = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn is_busy(&mut self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }

    fn position(&self) -> Duration {
        self.accumulated
            + self
                .started
                .map(|started| started.elapsed())
                .unwrap_or_default()
    }
}
