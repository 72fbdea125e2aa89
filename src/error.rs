//! Fatal error taxonomy for a viddur run.
//!
//! Everything here aborts the run before (or instead of) the concurrent probe
//! phase. Per-file probe failures are never errors at this level; they are
//! carried as [`ProbeOutcome::ProbeFailed`](crate::scanner::ProbeOutcome).

use std::path::PathBuf;

/// Exit status for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum ViddurError {
    /// Invalid argument combination or configuration value.
    #[error("{0}")]
    Config(String),

    /// The probing executable could not be located.
    #[error("\"{tool}\" is not found.")]
    DependencyMissing { tool: String },

    /// Several arguments were given and at least one is not a file.
    #[error("With multiple inputs you must provide only files.")]
    FilesOnly,

    /// A single argument names neither a file nor a directory.
    #[error("'{}' is not a valid directory or filename.", path.display())]
    InvalidPath { path: PathBuf },

    /// A directory could not be listed.
    #[error("cannot read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled from the terminal.
    #[error("Interrupted.")]
    Interrupted,
}

impl ViddurError {
    /// Convenience constructor for [`ViddurError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ViddurError::config("bad").exit_code(), 2);
        assert_eq!(ViddurError::FilesOnly.exit_code(), 1);
        assert_eq!(ViddurError::Interrupted.exit_code(), 1);
        assert_eq!(
            ViddurError::DependencyMissing {
                tool: "ffprobe".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ViddurError::DependencyMissing {
                tool: "ffprobe".into()
            }
            .to_string(),
            "\"ffprobe\" is not found."
        );
        assert_eq!(
            ViddurError::InvalidPath {
                path: PathBuf::from("fake")
            }
            .to_string(),
            "'fake' is not a valid directory or filename."
        );
    }
}
