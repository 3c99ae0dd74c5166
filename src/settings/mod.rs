// Persisted runtime state: the playlist paths and the volume, stored as a
// small JSON document. Load never fails toward the caller; a missing or
// corrupt file yields the defaults. Saves go through a temp file + rename
// so a crash mid-write leaves the previous document intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The on-disk document. Unknown fields are ignored on load, missing
/// fields take these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub media_list: Vec<PathBuf>,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    70.0
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            media_list: Vec::new(),
            volume: default_volume(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last persisted state. Any failure falls back to the
    /// defaults; the error is logged and swallowed.
    pub fn load(&self) -> PersistedState {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return PersistedState::default();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read settings");
                return PersistedState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "settings file is corrupt, using defaults");
                PersistedState::default()
            }
        }
    }

    /// Write the state out. Errors are logged and swallowed; persistence
    /// must never abort a transport operation.
    pub fn save(&self, state: &PersistedState) {
        if let Err(err) = self.try_save(state) {
            warn!(path = %self.path.display(), error = %err, "could not save settings");
        }
    }

    fn try_save(&self, state: &PersistedState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

        // Rename over the old file so a torn write cannot lose it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), tracks = state.media_list.len(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("mbox_settings.json"))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = store_in(&dir).load();
        assert_eq!(state, PersistedState::default());
        assert!(state.media_list.is_empty());
        assert_eq!(state.volume, 70.0);
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json at all {{{").unwrap();
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let state = PersistedState {
            media_list: (0..50).map(|i| PathBuf::from(format!("/music/track{i}.mp3"))).collect(),
            volume: 42.0,
        };
        store.save(&state);
        assert_eq!(store.load(), state);

        let empty = PersistedState {
            media_list: Vec::new(),
            volume: 0.0,
        };
        store.save(&empty);
        assert_eq!(store.load(), empty);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"media_list": ["/a.mp3"], "volume": 55, "theme": "dark", "window": [1200, 800]}"#,
        )
        .unwrap();

        let state = store.load();
        assert_eq!(state.media_list, vec![PathBuf::from("/a.mp3")]);
        assert_eq!(state.volume, 55.0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"media_list": ["/a.mp3"]}"#).unwrap();
        assert_eq!(store.load().volume, 70.0);

        fs::write(store.path(), r#"{}"#).unwrap();
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/deeper/settings.json"));
        store.save(&PersistedState::default());
        assert_eq!(store.load(), PersistedState::default());
    }
}
