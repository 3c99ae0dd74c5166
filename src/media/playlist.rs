use std::path::{Path, PathBuf};

use tracing::info;

use super::Track;

/// The flat, ordered playlist. Insertion order is preserved and duplicate
/// paths (exact match) are rejected.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every path not already present. Returns how many were
    /// actually added.
    pub fn add<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if self.contains(&path) {
                continue;
            }
            info!(path = %path.display(), "added to playlist");
            self.tracks.push(Track::new(path));
            added += 1;
        }
        added
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.tracks.iter().any(|track| track.matches(path))
    }

    pub fn clear(&mut self) {
        info!(dropped = self.tracks.len(), "playlist cleared");
        self.tracks.clear();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Paths in playlist order, the shape the settings store persists.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.tracks.iter().map(|track| track.path.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn add_reports_how_many_were_new() {
        let mut playlist = Playlist::new();
        assert_eq!(playlist.add(paths(&["a.mp3", "b.mp3"])), 2);
        assert_eq!(playlist.add(paths(&["b.mp3", "c.mp3"])), 1);
        assert_eq!(playlist.len(), 3);
    }

    #[test]
    fn adding_the_same_path_twice_is_idempotent() {
        let mut playlist = Playlist::new();
        playlist.add(paths(&["a.mp3"]));
        let before = playlist.len();
        assert_eq!(playlist.add(paths(&["a.mp3"])), 0);
        assert_eq!(playlist.len(), before);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut playlist = Playlist::new();
        playlist.add(paths(&["c.mp3", "a.mp3", "b.mp3"]));
        let stored = playlist.paths();
        assert_eq!(stored, paths(&["c.mp3", "a.mp3", "b.mp3"]));
    }

    #[test]
    fn clear_empties_the_list() {
        let mut playlist = Playlist::new();
        playlist.add(paths(&["a.mp3", "b.mp4"]));
        playlist.clear();
        assert!(playlist.is_empty());
        assert_eq!(playlist.get(0).map(|t| t.file_name()), None);
    }
}
