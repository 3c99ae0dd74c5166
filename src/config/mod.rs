// Configuration management for Mbox
// Handles loading/saving app settings, with sensible defaults when the
// config file is missing. Runtime state (playlist, volume) lives in the
// settings store instead, see crate::settings.

use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the JSON playlist/volume document lives.
    pub settings_file: PathBuf,
    pub log_directory: PathBuf,
    /// Directories scanned when media is added from inside the UI.
    pub media_directories: Vec<PathBuf>,
    pub media: MediaConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub auto_play_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// UI refresh / progress poll period.
    pub tick_interval_ms: u64,
    /// Fade applied when audio playback stops. Zero disables it.
    pub fade_out_ms: u64,
    /// External engines probed for video playback, in preference order.
    pub video_engines: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mbox");

        let mut media_directories = Vec::new();
        if let Some(dir) = dirs::audio_dir() {
            media_directories.push(dir);
        }
        if let Some(dir) = dirs::video_dir() {
            media_directories.push(dir);
        }

        Self {
            settings_file: app_dir.join("mbox_settings.json"),
            log_directory: app_dir.join("logs"),
            media_directories,
            media: MediaConfig {
                auto_play_next: true,
            },
            player: PlayerConfig {
                tick_interval_ms: 100,
                fade_out_ms: 200,
                video_engines: vec![
                    "vlc".to_string(),
                    "cvlc".to_string(),
                    "mpv".to_string(),
                ],
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("mbox");

        Ok(config_dir.join("config.toml"))
    }
}
