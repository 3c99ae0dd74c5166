use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Failures a backend can surface to the transport. These become one-line
/// notices in the UI; none of them are fatal.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupted media file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("audio output unavailable: {0}")]
    Output(#[from] rodio::PlayError),

    #[error("no video engine installed; install vlc or mpv for video playback")]
    VideoUnavailable,

    #[error("could not launch video engine '{engine}': {source}")]
    EngineLaunch {
        engine: String,
        #[source]
        source: std::io::Error,
    },
}

/// The surface the session drives. `load` arms a track without starting
/// it; `play` starts the armed track. Implementations are synchronous and
/// cheap, every call returns straight to the event loop.
pub trait MediaBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError>;
    fn play(&mut self) -> Result<(), BackendError>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    /// Volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);
    /// Whether the backend still has something rendering.
    fn is_busy(&mut self) -> bool;
    /// Elapsed playback time of the current track.
    fn position(&self) -> Duration;
}
