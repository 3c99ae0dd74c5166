use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::media::{MediaKind, Playlist, Track};
use crate::settings::{PersistedState, SettingsStore};

use super::backend::{BackendError, MediaBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
    /// A video track was selected but no engine is installed. Distinct
    /// from Playing so the UI never claims playback that is not happening.
    Unsupported,
}

/// The playback state machine. Owns the playlist, the current index, the
/// status and the volume; dispatches tracks to the audio or video backend
/// by media kind and persists playlist/volume changes through the
/// settings store.
///
/// Invariants: `current_index` stays in `[0, len)` while the playlist is
/// non-empty; every transport operation is a no-op on an empty playlist;
/// volume stays in `[0, 100]`.
pub struct PlaybackSession<A, V> {
    playlist: Playlist,
    current_index: usize,
    status: PlaybackStatus,
    volume: u8,
    /// Which backend owns the sound/window right now.
    active: Option<MediaKind>,
    audio: A,
    video: Option<V>,
    store: SettingsStore,
}

impl<A: MediaBackend, V: MediaBackend> PlaybackSession<A, V> {
    /// Restore the persisted playlist and volume; starts Stopped at index 0.
    pub fn new(store: SettingsStore, audio: A, video: Option<V>) -> Self {
        let state = store.load();
        let mut playlist = Playlist::new();
        playlist.add(state.media_list);
        let volume = state.volume.round().clamp(0.0, 100.0) as u8;

        let mut session = Self {
            playlist,
            current_index: 0,
            status: PlaybackStatus::Stopped,
            volume,
            active: None,
            audio,
            video,
            store,
        };
        session.audio.set_volume(session.volume as f32 / 100.0);
        session
    }

    /// Start playback of `index` (or the current track when `None`). An
    /// index that fell out of range resets to the head of the playlist.
    pub fn play(&mut self, index: Option<usize>) -> Result<(), BackendError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        if let Some(index) = index {
            self.current_index = index;
        }
        if self.current_index >= self.playlist.len() {
            self.current_index = 0;
        }

        let Some(track) = self.playlist.get(self.current_index) else {
            return Ok(());
        };
        let path = track.path.clone();
        let kind = track.kind;

        self.halt_backends();

        match kind {
            MediaKind::Audio => {
                if let Err(err) = self.start_audio(&path) {
                    warn!(path = %path.display(), error = %err, "audio playback failed");
                    self.status = PlaybackStatus::Stopped;
                    return Err(err);
                }
                self.active = Some(MediaKind::Audio);
            }
            MediaKind::Video => {
                let Some(video) = self.video.as_mut() else {
                    warn!(path = %path.display(), "video track selected without a video engine");
                    self.status = PlaybackStatus::Unsupported;
                    return Err(BackendError::VideoUnavailable);
                };
                let started = match video.load(&path) {
                    Ok(()) => video.play(),
                    Err(err) => Err(err),
                };
                if let Err(err) = started {
                    warn!(path = %path.display(), error = %err, "video playback failed");
                    self.status = PlaybackStatus::Stopped;
                    return Err(err);
                }
                self.active = Some(MediaKind::Video);
            }
        }

        info!(index = self.current_index, path = %path.display(), kind = kind.label(), "playing");
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    /// Space-bar semantics: pause when playing, resume when paused,
    /// otherwise (re)start the current track.
    pub fn toggle(&mut self) -> Result<(), BackendError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        match self.status {
            PlaybackStatus::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackStatus::Paused => {
                self.resume();
                Ok(())
            }
            PlaybackStatus::Stopped | PlaybackStatus::Unsupported => self.play(None),
        }
    }

    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        match self.active {
            Some(MediaKind::Audio) => self.audio.pause(),
            Some(MediaKind::Video) => {
                if let Some(video) = self.video.as_mut() {
                    video.pause();
                }
            }
            None => {}
        }
        self.status = PlaybackStatus::Paused;
    }

    pub fn resume(&mut self) {
        if self.status != PlaybackStatus::Paused {
            return;
        }
        match self.active {
            Some(MediaKind::Audio) => self.audio.resume(),
            Some(MediaKind::Video) => {
                if let Some(video) = self.video.as_mut() {
                    video.resume();
                }
            }
            None => {}
        }
        self.status = PlaybackStatus::Playing;
    }

    /// Stop playback. The current index survives so play resumes on the
    /// same track.
    pub fn stop(&mut self) {
        self.halt_backends();
        self.status = PlaybackStatus::Stopped;
    }

    pub fn next(&mut self) -> Result<(), BackendError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        let index = (self.current_index + 1) % self.playlist.len();
        self.play(Some(index))
    }

    pub fn previous(&mut self) -> Result<(), BackendError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        let len = self.playlist.len();
        let index = (self.current_index + len - 1) % len;
        self.play(Some(index))
    }

    /// Clamp into `[0, 100]`, forward to the backends and persist.
    pub fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, 100) as u8;
        self.audio.set_volume(self.volume as f32 / 100.0);
        if let Some(video) = self.video.as_mut() {
            video.set_volume(self.volume as f32 / 100.0);
        }
        self.persist();
    }

    /// Append unique paths; returns how many were new. Persists.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) -> usize {
        let added = self.playlist.add(paths);
        self.persist();
        added
    }

    /// Drop every track; playback stops and the empty list is persisted.
    pub fn clear(&mut self) {
        self.playlist.clear();
        self.stop();
        self.current_index = 0;
        self.persist();
    }

    /// Tick-driven: when the active backend has drained, advance to the
    /// next track or stop, depending on `auto_next`.
    pub fn poll_finished(&mut self, auto_next: bool) -> Result<(), BackendError> {
        if self.status != PlaybackStatus::Playing {
            return Ok(());
        }
        let busy = match self.active {
            Some(MediaKind::Audio) => self.audio.is_busy(),
            Some(MediaKind::Video) => self.video.as_mut().map(|v| v.is_busy()).unwrap_or(false),
            None => return Ok(()),
        };
        if busy {
            return Ok(());
        }

        if auto_next {
            self.next()
        } else {
            self.stop();
            Ok(())
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.current_index)
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Elapsed time of the current track, ZERO unless audio is active.
    pub fn position(&self) -> Duration {
        match self.active {
            Some(MediaKind::Audio) => self.audio.position(),
            _ => Duration::ZERO,
        }
    }

    pub fn video_available(&self) -> bool {
        self.video.is_some()
    }

    fn start_audio(&mut self, path: &std::path::Path) -> Result<(), BackendError> {
        self.audio.load(path)?;
        self.audio.set_volume(self.volume as f32 / 100.0);
        self.audio.play()
    }

    fn halt_backends(&mut self) {
        self.audio.stop();
        if let Some(video) = self.video.as_mut() {
            video.stop();
        }
        self.active = None;
    }

    fn persist(&self) {
        let state = PersistedState {
            media_list: self.playlist.paths(),
            volume: self.volume as f32,
        };
        self.store.save(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[derive(Debug, Default)]
    struct FakeBackend {
        calls: Vec<String>,
        busy: bool,
        fail_load: bool,
    }

    impl MediaBackend for FakeBackend {
        fn load(&mut self, path: &Path) -> Result<(), BackendError> {
            self.calls.push(format!("load {}", path.display()));
            if self.fail_load {
                return Err(BackendError::Open {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                });
            }
            Ok(())
        }

        fn play(&mut self) -> Result<(), BackendError> {
            self.calls.push("play".to_string());
            self.busy = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push("pause".to_string());
        }

        fn resume(&mut self) {
            self.calls.push("resume".to_string());
        }

        fn stop(&mut self) {
            self.calls.push("stop".to_string());
            self.busy = false;
        }

        fn set_volume(&mut self, volume: f32) {
            self.calls.push(format!("volume {volume:.2}"));
        }

        fn is_busy(&mut self) -> bool {
            self.busy
        }

        fn position(&self) -> Duration {
            Duration::ZERO
        }
    }

    type TestSession = PlaybackSession<FakeBackend, FakeBackend>;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json"))
    }

    fn session(paths: &[&str], with_video: bool) -> (TestSession, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let video = with_video.then(FakeBackend::default);
        let mut session = TestSession::new(store_in(&dir), FakeBackend::default(), video);
        session.add_paths(paths.iter().map(PathBuf::from).collect());
        (session, dir)
    }

    fn transport_calls(backend: &FakeBackend) -> Vec<&String> {
        backend
            .calls
            .iter()
            .filter(|call| !call.starts_with("volume"))
            .collect()
    }

    #[test]
    fn empty_playlist_transport_is_a_no_op() {
        let (mut session, _dir) = session(&[], false);

        session.play(None).unwrap();
        session.next().unwrap();
        session.previous().unwrap();
        session.toggle().unwrap();

        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert_eq!(session.current_index(), 0);
        assert!(transport_calls(&session.audio).is_empty());
    }

    #[test]
    fn next_then_previous_round_trips() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3", "c.mp3"], false);
        session.play(Some(1)).unwrap();

        session.next().unwrap();
        assert_eq!(session.current_index(), 2);
        session.previous().unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn index_wraps_at_both_ends() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3", "c.mp3"], false);

        session.play(Some(0)).unwrap();
        session.previous().unwrap();
        assert_eq!(session.current_index(), 2);

        session.next().unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn mixed_kinds_dispatch_to_the_right_backend() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp4"], true);

        session.play(Some(0)).unwrap();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert!(session.audio.calls.iter().any(|c| c == "load a.mp3"));

        session.next().unwrap();
        assert_eq!(session.current_index(), 1);
        let video = session.video.as_ref().unwrap();
        assert!(video.calls.iter().any(|c| c == "load b.mp4"));

        session.next().unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            session.audio.calls.iter().filter(|c| *c == "load a.mp3").count(),
            2
        );
    }

    #[test]
    fn video_without_engine_is_unsupported() {
        let (mut session, _dir) = session(&["clip.mp4"], false);

        let err = session.play(None).unwrap_err();
        assert!(matches!(err, BackendError::VideoUnavailable));
        assert_eq!(session.status(), PlaybackStatus::Unsupported);
        assert!(!session.audio.calls.iter().any(|c| c.starts_with("load")));
    }

    #[test]
    fn audio_failure_leaves_session_stopped() {
        let (mut session, _dir) = session(&["broken.mp3"], false);
        session.audio.fail_load = true;

        assert!(session.play(None).is_err());
        assert_eq!(session.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn pause_and_resume_only_fire_from_the_right_states() {
        let (mut session, _dir) = session(&["a.mp3"], false);

        // Not playing yet: pause is a no-op
        session.pause();
        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert!(!session.audio.calls.iter().any(|c| c == "pause"));

        session.play(None).unwrap();
        session.pause();
        assert_eq!(session.status(), PlaybackStatus::Paused);
        assert!(session.audio.calls.iter().any(|c| c == "pause"));

        session.resume();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert!(session.audio.calls.iter().any(|c| c == "resume"));
    }

    #[test]
    fn toggle_cycles_between_playing_and_paused() {
        let (mut session, _dir) = session(&["a.mp3"], false);

        session.toggle().unwrap();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        session.toggle().unwrap();
        assert_eq!(session.status(), PlaybackStatus::Paused);
        session.toggle().unwrap();
        assert_eq!(session.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn stop_keeps_the_current_index() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3"], false);
        session.play(Some(1)).unwrap();

        session.stop();
        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn out_of_range_index_resets_to_the_head() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3"], false);

        session.play(Some(7)).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn volume_clamps_and_persists() {
        let (mut session, dir) = session(&[], false);

        session.set_volume(-5);
        assert_eq!(session.volume(), 0);
        session.set_volume(150);
        assert_eq!(session.volume(), 100);

        let reloaded = store_in(&dir).load();
        assert_eq!(reloaded.volume, 100.0);
    }

    #[test]
    fn playlist_changes_persist() {
        let (mut session, dir) = session(&["a.mp3", "b.mp4"], false);

        let reloaded = store_in(&dir).load();
        assert_eq!(
            reloaded.media_list,
            vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp4")]
        );

        assert_eq!(session.add_paths(vec![PathBuf::from("a.mp3")]), 0);
        assert_eq!(store_in(&dir).load().media_list.len(), 2);
    }

    #[test]
    fn clear_forces_stop_and_persists_the_empty_list() {
        let (mut session, dir) = session(&["a.mp3", "b.mp3"], false);
        session.play(Some(1)).unwrap();

        session.clear();
        assert!(session.playlist().is_empty());
        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert_eq!(session.current_index(), 0);
        assert!(store_in(&dir).load().media_list.is_empty());
    }

    #[test]
    fn session_restores_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&PersistedState {
            media_list: vec![PathBuf::from("x.mp3"), PathBuf::from("y.ogg")],
            volume: 30.0,
        });

        let session = TestSession::new(store, FakeBackend::default(), None);
        assert_eq!(session.playlist().len(), 2);
        assert_eq!(session.volume(), 30);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn poll_advances_when_the_track_drains() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3"], false);
        session.play(Some(0)).unwrap();

        // Still busy: nothing changes
        session.poll_finished(true).unwrap();
        assert_eq!(session.current_index(), 0);

        session.audio.busy = false;
        session.poll_finished(true).unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn poll_stops_when_auto_next_is_off() {
        let (mut session, _dir) = session(&["a.mp3", "b.mp3"], false);
        session.play(Some(0)).unwrap();

        session.audio.busy = false;
        session.poll_finished(false).unwrap();
        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert_eq!(session.current_index(), 0);
    }
}
