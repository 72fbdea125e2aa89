//! Media classification for candidate files.
//!
//! Decides, without running any probe, whether a file is worth probing. The
//! default strategy guesses a MIME type from the file extension and accepts
//! anything whose top-level type is `video`.

use std::path::Path;

/// Extension to MIME type table used for guessing.
///
/// Audio, image and document types are listed too so a guess exists for the
/// files that commonly sit next to videos; they classify as non-media.
const MIME_TYPES: &[(&str, &str)] = &[
    // Video
    ("3g2", "video/3gpp2"),
    ("3gp", "video/3gpp"),
    ("avi", "video/x-msvideo"),
    ("flv", "video/x-flv"),
    ("m1v", "video/mpeg"),
    ("m2ts", "video/mp2t"),
    ("m4v", "video/x-m4v"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("movie", "video/x-sgi-movie"),
    ("mp4", "video/mp4"),
    ("mpa", "video/mpeg"),
    ("mpe", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("mts", "video/mp2t"),
    ("ogv", "video/ogg"),
    ("qt", "video/quicktime"),
    ("ts", "video/mp2t"),
    ("vob", "video/x-ms-vob"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    // Audio
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("mka", "audio/x-matroska"),
    ("mp3", "audio/mpeg"),
    ("oga", "audio/ogg"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("wav", "audio/x-wav"),
    // Subtitles and text
    ("ass", "text/x-ssa"),
    ("srt", "application/x-subrip"),
    ("txt", "text/plain"),
    ("vtt", "text/vtt"),
    // Images
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    // Documents and archives
    ("json", "application/json"),
    ("nfo", "text/x-nfo"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// Guess a MIME type from the extension of `path`, case-insensitively.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use viddur::scanner::classifier::guess_mime_type;
///
/// assert_eq!(guess_mime_type(Path::new("movie.MKV")), Some("video/x-matroska"));
/// assert_eq!(guess_mime_type(Path::new("README")), None);
/// ```
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Result of classifying a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Worth a probe.
    Eligible,
    /// Skipped without probing.
    NotMedia,
}

/// Strategy deciding whether a path looks like video media.
pub trait MediaClassifier: Send + Sync {
    fn is_video(&self, path: &Path) -> bool;

    fn classify(&self, path: &Path) -> Classification {
        if self.is_video(path) {
            Classification::Eligible
        } else {
            Classification::NotMedia
        }
    }
}

/// Classifies by guessed MIME type: `video/*` is eligible, everything else
/// (including unknown extensions) is not.
#[derive(Debug, Default, Clone, Copy)]
pub struct MimeClassifier;

impl MediaClassifier for MimeClassifier {
    fn is_video(&self, path: &Path) -> bool {
        guess_mime_type(path)
            .and_then(|mime| mime.split('/').next())
            .is_some_and(|top| top == "video")
    }
}

/// Treats every file as eligible (`--all`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl MediaClassifier for AcceptAll {
    fn is_video(&self, _path: &Path) -> bool {
        true
    }
}

/// Pick the classifier for a run.
pub fn classifier_for(accept_all: bool) -> Box<dyn MediaClassifier> {
    if accept_all {
        Box::new(AcceptAll)
    } else {
        Box::new(MimeClassifier)
    }
}
