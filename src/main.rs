// Mbox - terminal media player
// Loads the persisted playlist, probes the playback backends and hands
// control to the TUI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mbox::config::Config;
use mbox::media::MediaScanner;
use mbox::player::{AudioBackend, PlaybackSession, VideoBackend};
use mbox::settings::SettingsStore;
use mbox::ui::App;

#[derive(Parser)]
#[command(name = "mbox", version, about = "Terminal media player with a flat, persistent playlist")]
struct Cli {
    /// Media files or directories to add to the playlist on startup
    paths: Vec<PathBuf>,

    /// Use a different settings file than the configured one
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config falls back to defaults if missing
    let config = Config::load()?;
    let _log_guard = mbox::logging::init(&config.log_directory)?;

    let store = SettingsStore::new(
        cli.settings.unwrap_or_else(|| config.settings_file.clone()),
    );
    let audio = AudioBackend::new(Duration::from_millis(config.player.fade_out_ms))?;
    let video = VideoBackend::probe(&config.player.video_engines);
    let mut session = PlaybackSession::new(store, audio, video);

    if !cli.paths.is_empty() {
        let scanner = MediaScanner::new();
        let found = scanner.collect(&cli.paths);
        let added = session.add_paths(found);
        info!(added, "added media from command line");
    }

    // Fire up the TUI and let it rip
    let mut app = App::new(config, session)?;
    app.run().await
}
