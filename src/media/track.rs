use std::path::{Path, PathBuf};
use std::time::Duration;

use id3::TagLike;

use super::MediaKind;

/// One playable file: a path plus its derived media kind. Tag metadata is
/// display-only; the transport never consults it.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(path: PathBuf) -> Self {
        let kind = MediaKind::from_path(&path);
        let mut track = Self {
            path,
            kind,
            title: None,
            artist: None,
            duration: None,
        };
        if track.kind == MediaKind::Audio {
            track.read_tags();
        }
        track
    }

    /// Best-effort tag read; a missing or unreadable tag just leaves the
    /// display fields empty.
    fn read_tags(&mut self) {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => {
                if let Ok(tag) = id3::Tag::read_from_path(&self.path) {
                    self.title = tag.title().map(|s| s.to_string());
                    self.artist = tag.artist().map(|s| s.to_string());
                    self.duration = tag.duration().map(|ms| Duration::from_millis(ms as u64));
                }
            }
            Some(ext) if ext.eq_ignore_ascii_case("m4a") => {
                if let Ok(tag) = mp4ameta::Tag::read_from_path(&self.path) {
                    self.title = tag.title().map(|s| s.to_string());
                    self.artist = tag.artist().map(|s| s.to_string());
                    self.duration = tag.duration();
                }
            }
            _ => {}
        }
    }

    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.file_name())
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.path.as_path() == path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_derived_from_extension() {
        assert_eq!(Track::new(PathBuf::from("a.ogg")).kind, MediaKind::Audio);
        assert_eq!(Track::new(PathBuf::from("b.avi")).kind, MediaKind::Video);
    }

    #[test]
    fn display_title_falls_back_to_file_name() {
        let track = Track::new(PathBuf::from("/music/favorite song.mp3"));
        assert_eq!(track.display_title(), "favorite song.mp3");
    }
}
