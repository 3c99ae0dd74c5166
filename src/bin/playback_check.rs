// Manual smoke check for the playback session without the TUI.
// Usage: cargo run --bin playback_check [media_directory]

use std::path::PathBuf;
use std::time::Duration;

use mbox::media::MediaScanner;
use mbox::player::{AudioBackend, PlaybackSession, PlaybackStatus, VideoBackend};
use mbox::settings::SettingsStore;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Mbox playback check");
    println!("===================");

    let media_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(format!("{home}/Music"))
        });

    if !media_dir.exists() {
        println!("media directory not found: {}", media_dir.display());
        println!("Usage: cargo run --bin playback_check [media_directory]");
        return Ok(());
    }

    println!("scanning {}", media_dir.display());
    let scanner = MediaScanner::new();
    let found = scanner.scan_directory(&media_dir);
    if found.is_empty() {
        println!("no media files found");
        return Ok(());
    }

    let settings_path = std::env::temp_dir().join("mbox_playback_check.json");
    let _ = std::fs::remove_file(&settings_path);
    let store = SettingsStore::new(settings_path);
    let audio = AudioBackend::new(Duration::from_millis(200))?;
    let video = VideoBackend::probe(&["vlc".to_string(), "mpv".to_string()]);
    let mut session = PlaybackSession::new(store, audio, video);

    let added = session.add_paths(found);
    println!("added {added} tracks");

    println!("playing first track for 5 seconds...");
    if let Err(err) = session.play(Some(0)) {
        println!("playback failed: {err}");
        return Ok(());
    }
    sleep(Duration::from_secs(5)).await;

    println!("pausing for 2 seconds...");
    session.pause();
    assert_eq!(session.status(), PlaybackStatus::Paused);
    sleep(Duration::from_secs(2)).await;

    println!("resuming for 3 seconds...");
    session.resume();
    sleep(Duration::from_secs(3)).await;

    println!("volume down to 30...");
    session.set_volume(30);
    sleep(Duration::from_secs(2)).await;

    println!("skipping to next track...");
    if let Err(err) = session.next() {
        println!("next failed: {err}");
    }
    sleep(Duration::from_secs(3)).await;

    println!("stopping");
    session.stop();
    assert_eq!(session.status(), PlaybackStatus::Stopped);

    println!("playback check finished");
    Ok(())
}
