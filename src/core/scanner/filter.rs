//! File classification for the scanner.

use super::MediaKind;
use std::path::Path;

/// Decides whether a path is a photo, a video, or skipped
#[derive(Debug, Clone, Default)]
pub struct MediaFilter;

impl MediaFilter {
    pub fn new() -> Self {
        Self
    }

    /// Classify a file by its lower-cased extension
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(MediaKind::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension() {
        let filter = MediaFilter::new();
        assert_eq!(filter.classify(Path::new("/a/IMG_0001.JPG")), Some(MediaKind::Photo));
        assert_eq!(filter.classify(Path::new("/a/clip.webm")), Some(MediaKind::Video));
        assert_eq!(filter.classify(Path::new("/a/notes.pdf")), None);
    }

    #[test]
    fn files_without_extension_are_skipped() {
        let filter = MediaFilter::new();
        assert_eq!(filter.classify(Path::new("/a/README")), None);
        assert_eq!(filter.classify(Path::new("/a/.jpg")), None);
    }

    #[test]
    fn only_the_last_extension_counts() {
        let filter = MediaFilter::new();
        assert_eq!(filter.classify(Path::new("/a/photo.jpg.bak")), None);
        assert_eq!(filter.classify(Path::new("/a/archive.tar.mp4")), Some(MediaKind::Video));
    }
}
