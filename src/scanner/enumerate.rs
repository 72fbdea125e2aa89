//! Resolution of command-line path arguments into candidate files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ViddurError;

/// A file to classify and probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    path: PathBuf,
    location: PathBuf,
}

impl Candidate {
    /// A candidate named exactly as given on the command line.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.clone(),
            path,
        }
    }

    /// A candidate found under `root`, displayed relative to it.
    pub fn under(root: &Path, relative: impl Into<PathBuf>) -> Self {
        let path = relative.into();
        Self {
            location: root.join(&path),
            path,
        }
    }

    /// Path shown in reports.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path handed to the prober.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Resolve path arguments into candidates.
///
/// - no argument: the current directory
/// - one existing file: just that file
/// - several arguments: all must be existing files, kept in the given order
/// - one directory: its files, or with `recursive` every file below it
///
/// # Errors
///
/// [`ViddurError::FilesOnly`] when several arguments include a non-file,
/// [`ViddurError::InvalidPath`] when a single argument does not exist, and
/// [`ViddurError::ReadDir`] when a directory cannot be listed.
pub fn enumerate(paths: &[PathBuf], recursive: bool) -> Result<Vec<Candidate>, ViddurError> {
    match paths {
        [] => enumerate(&[PathBuf::from(".")], recursive),
        [single] if single.is_file() => Ok(vec![Candidate::new(single)]),
        [dir] if dir.is_dir() => files_in(dir, recursive),
        [other] => Err(ViddurError::InvalidPath {
            path: other.clone(),
        }),
        many => {
            if let Some(bad) = many.iter().find(|p| !p.is_file()) {
                debug!("Not a file among multiple inputs: {:?}", bad);
                return Err(ViddurError::FilesOnly);
            }
            Ok(many.iter().map(Candidate::new).collect())
        }
    }
}

/// Files inside `dir`, sorted by name, or with `recursive` every file at any
/// depth below it.
///
/// Failing to list `dir` itself is fatal. Unreadable entries further down are
/// skipped with a warning.
fn files_in(dir: &Path, recursive: bool) -> Result<Vec<Candidate>, ViddurError> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ViddurError::ReadDir {
                    path: dir.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let file_path = entry.path();

        // Skip directories, including symlinks pointing at one
        if file_path.is_dir() {
            continue;
        }

        let relative = file_path.strip_prefix(dir).unwrap_or(file_path);
        candidates.push(Candidate::under(dir, relative));
    }

    debug!("Found {} files in {:?}", candidates.len(), dir);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    /// `a.mp4`, `b.pdf`, `sub/c.mkv` and an empty `sub/empty/`.
    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"Some nonsense").unwrap();
        fs::write(dir.path().join("b.pdf"), b"Some nonsense").unwrap();
        fs::create_dir_all(dir.path().join("sub/empty")).unwrap();
        fs::write(dir.path().join("sub/c.mkv"), b"Some nonsense").unwrap();
        dir
    }

    fn display_paths(candidates: &[Candidate]) -> BTreeSet<PathBuf> {
        candidates.iter().map(|c| c.path().to_path_buf()).collect()
    }

    #[test]
    fn test_non_recursive_lists_direct_files_only() {
        let dir = fixture();
        let candidates = enumerate(&[dir.path().to_path_buf()], false).unwrap();

        let expected: BTreeSet<PathBuf> = ["a.mp4", "b.pdf"].iter().map(PathBuf::from).collect();
        assert_eq!(display_paths(&candidates), expected);
        assert_eq!(candidates[0].location(), dir.path().join("a.mp4"));
    }

    #[test]
    fn test_listing_is_sorted_by_name() {
        let dir = fixture();
        fs::write(dir.path().join("0_first.mkv"), b"Some nonsense").unwrap();
        let candidates = enumerate(&[dir.path().to_path_buf()], false).unwrap();

        let names: Vec<&Path> = candidates.iter().map(Candidate::path).collect();
        assert_eq!(
            names,
            [Path::new("0_first.mkv"), Path::new("a.mp4"), Path::new("b.pdf")]
        );
    }

    #[test]
    fn test_recursive_walks_whole_tree() {
        let dir = fixture();
        let candidates = enumerate(&[dir.path().to_path_buf()], true).unwrap();

        let expected: BTreeSet<PathBuf> = ["a.mp4", "b.pdf", "sub/c.mkv"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(display_paths(&candidates), expected);
        assert_eq!(candidates.len(), 3);

        let nested = candidates
            .iter()
            .find(|c| c.path() == Path::new("sub/c.mkv"))
            .unwrap();
        assert_eq!(nested.location(), dir.path().join("sub/c.mkv"));
        assert!(nested.location().is_file());
    }

    #[test]
    fn test_single_file_argument() {
        let dir = fixture();
        let file = dir.path().join("a.mp4");
        let candidates = enumerate(&[file.clone()], true).unwrap();
        assert_eq!(candidates, vec![Candidate::new(file)]);
    }

    #[test]
    fn test_multiple_files_keep_order() {
        let dir = fixture();
        let b = dir.path().join("b.pdf");
        let a = dir.path().join("a.mp4");
        let candidates = enumerate(&[b.clone(), a.clone()], false).unwrap();
        assert_eq!(candidates, vec![Candidate::new(b), Candidate::new(a)]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let dir = fixture();
        let a = dir.path().join("a.mp4");
        let candidates = enumerate(&[a.clone(), a.clone()], false).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_multiple_inputs_with_directory_fail() {
        let dir = fixture();
        let result = enumerate(&[dir.path().join("a.mp4"), dir.path().join("sub")], false);
        assert!(matches!(result, Err(ViddurError::FilesOnly)));
    }

    #[test]
    fn test_multiple_inputs_with_missing_file_fail() {
        let dir = fixture();
        let result = enumerate(&[dir.path().join("a.mp4"), dir.path().join("nope.mp4")], false);
        assert!(matches!(result, Err(ViddurError::FilesOnly)));
    }

    #[test]
    fn test_single_invalid_path_fails() {
        let dir = fixture();
        let fake = dir.path().join("fake");
        let result = enumerate(&[fake.clone()], false);
        assert!(matches!(result, Err(ViddurError::InvalidPath { path }) if path == fake));
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(enumerate(&[dir.path().to_path_buf()], false).unwrap().is_empty());
        assert!(enumerate(&[dir.path().to_path_buf()], true).unwrap().is_empty());
    }
}
