use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::is_media_file;

/// Finds playable files on disk. Directories are walked recursively and
/// filtered by the supported extension sets; explicitly named files are
/// taken as-is, mirroring a file picker where the user's choice wins.
#[derive(Debug, Default, Clone)]
pub struct MediaScanner;

impl MediaScanner {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a mixed list of files and directories into playable paths.
    pub fn collect(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for input in inputs {
            if input.is_dir() {
                found.extend(self.scan_directory(input));
            } else if input.is_file() {
                found.push(input.clone());
            } else {
                warn!(path = %input.display(), "skipping path that does not exist");
            }
        }
        found
    }

    pub fn scan_directories(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for path in paths {
            if path.exists() {
                found.extend(self.scan_directory(path));
            }
        }
        found
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, path: P) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            // Skip hidden files (dotfiles)
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'))
            {
                continue;
            }

            // Skip empty files; nothing playable in them
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() == 0 {
                    continue;
                }
            }

            if is_media_file(path) {
                found.push(path.to_path_buf());
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"x").unwrap();
        path
    }

    #[test]
    fn directories_are_filtered_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let song = touch(dir.path(), "song.mp3");
        let clip = touch(dir.path(), "clip.mp4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".hidden.mp3");

        let scanner = MediaScanner::new();
        let mut found = scanner.collect(&[dir.path().to_path_buf()]);
        found.sort();

        let mut expected = vec![song, clip];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn explicit_files_are_taken_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let odd = touch(dir.path(), "mixtape.weird");

        let scanner = MediaScanner::new();
        let found = scanner.collect(&[odd.clone()]);
        assert_eq!(found, vec![odd]);
    }

    #[test]
    fn missing_paths_yield_nothing() {
        let scanner = MediaScanner::new();
        let found = scanner.collect(&[PathBuf::from("/definitely/not/here")]);
        assert!(found.is_empty());
    }
}
