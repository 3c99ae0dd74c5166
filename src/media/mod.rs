pub mod playlist;
pub mod scanner;
pub mod track;

pub use playlist::Playlist;
pub use scanner::MediaScanner;
pub use track::Track;

use std::path::Path;

/// Extensions handled by the rodio mixer.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a", "ogg"];

/// Extensions handed off to the external video engine.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Everything outside the audio set is treated as video, matching the
    /// dispatch rule of the transport: audio goes to the mixer, the rest to
    /// the external engine.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => {
                let normalized = ext.to_ascii_lowercase();
                if AUDIO_EXTENSIONS.contains(&normalized.as_str()) {
                    MediaKind::Audio
                } else {
                    MediaKind::Video
                }
            }
            None => MediaKind::Video,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

/// True when the extension belongs to either supported set. Used by the
/// directory scanner; files picked explicitly bypass this filter.
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let normalized = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&normalized.as_str())
                || VIDEO_EXTENSIONS.contains(&normalized.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn audio_extensions_classify_as_audio() {
        for ext in AUDIO_EXTENSIONS {
            let path = PathBuf::from(format!("song.{ext}"));
            assert_eq!(MediaKind::from_path(&path), MediaKind::Audio);
        }
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(MediaKind::from_path(Path::new("SONG.MP3")), MediaKind::Audio);
        assert_eq!(MediaKind::from_path(Path::new("clip.MkV")), MediaKind::Video);
    }

    #[test]
    fn everything_else_is_video() {
        assert_eq!(MediaKind::from_path(Path::new("clip.mp4")), MediaKind::Video);
        assert_eq!(MediaKind::from_path(Path::new("readme.txt")), MediaKind::Video);
        assert_eq!(MediaKind::from_path(Path::new("no_extension")), MediaKind::Video);
    }

    #[test]
    fn media_filter_accepts_both_sets_only() {
        assert!(is_media_file(Path::new("a.flac")));
        assert!(is_media_file(Path::new("b.webm")));
        assert!(!is_media_file(Path::new("notes.txt")));
        assert!(!is_media_file(Path::new("no_extension")));
    }
}
