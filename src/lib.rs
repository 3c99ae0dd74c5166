// Mbox - terminal media player
// A flat playlist of local audio/video files, playback delegated to rodio
// (audio) or an external engine (video), settings persisted as JSON.

pub mod config;    // app configuration (TOML, user config dir)
pub mod logging;   // file-based tracing setup
pub mod media;     // tracks, playlist, classification, scanning
pub mod player;    // backends and the playback session state machine
pub mod settings;  // persisted playlist + volume (JSON)
pub mod ui;        // terminal interface

// Export the stuff other modules actually use
pub use config::Config;
pub use media::{MediaKind, MediaScanner, Playlist, Track};
pub use player::{
    AudioBackend, BackendError, MediaBackend, PlaybackSession, PlaybackStatus, VideoBackend,
};
pub use settings::{PersistedState, SettingsStore};
