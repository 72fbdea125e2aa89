//! Duration probing.
//!
//! A [`DurationProber`] turns one media file into its playback length in
//! seconds. The production implementation shells out to `ffprobe` once per
//! file and reads a single numeric field from its standard output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::command::ToolCommand;
use crate::tools::{get_tool_path, FFPROBE};
use crate::{Error, Result};

/// Arguments that make ffprobe print only the container duration.
const DURATION_ARGS: &[&str] = &[
    "-show_entries",
    "format=duration",
    "-of",
    "default=noprint_wrappers=1:nokey=1",
];

/// What ffprobe prints when the duration cannot be determined.
const INDETERMINATE: &str = "N/A";

/// Something that can measure the playback duration of a file.
///
/// Implementations must be safe to share across tasks (`Send + Sync`).
#[async_trait]
pub trait DurationProber: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Return the duration of `path` in seconds.
    ///
    /// A successful result is always finite and strictly positive.
    async fn duration(&self, path: &Path) -> Result<f64>;
}

/// [`DurationProber`] backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeDuration {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfprobeDuration {
    /// Create a prober for an already resolved executable path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            timeout: None,
        }
    }

    /// Locate ffprobe, preferring `configured` when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if ffprobe cannot be located.
    pub fn discover(configured: Option<&Path>) -> Result<Self> {
        let program = get_tool_path(FFPROBE, configured)?;
        tracing::debug!("Using {} at {}", FFPROBE, program.display());
        Ok(Self::new(program))
    }

    /// Kill probes that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the executable this prober runs.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl DurationProber for FfprobeDuration {
    fn name(&self) -> &'static str {
        FFPROBE
    }

    async fn duration(&self, path: &Path) -> Result<f64> {
        let output = ToolCommand::new(self.program.clone())
            .args(DURATION_ARGS)
            .arg(path)
            .timeout(self.timeout)
            .execute()
            .await?;

        parse_duration(path, &output.stdout)
    }
}

/// Parse ffprobe's duration output for `path`.
///
/// The `N/A` sentinel, a zero value and anything that is not a finite,
/// non-negative number are all rejected.
pub fn parse_duration(path: &Path, stdout: &str) -> Result<f64> {
    let text = stdout.trim();

    if text == INDETERMINATE {
        return Err(Error::Indeterminate {
            path: path.to_path_buf(),
        });
    }

    let seconds: f64 = text
        .parse()
        .map_err(|e| Error::parse_error(FFPROBE, format!("{text:?}: {e}")))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Error::parse_error(
            FFPROBE,
            format!("{text:?} is not a valid duration"),
        ));
    }

    if seconds == 0.0 {
        return Err(Error::ZeroDuration {
            path: path.to_path_buf(),
        });
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(stdout: &str) -> Result<f64> {
        parse_duration(Path::new("movie.mkv"), stdout)
    }

    #[test]
    fn test_parse_positive_duration() {
        assert_eq!(parse("1.0").unwrap(), 1.0);
        assert_eq!(parse("7200.000000\n").unwrap(), 7200.0);
    }

    #[test]
    fn test_parse_zero_is_rejected() {
        assert!(matches!(parse("0"), Err(Error::ZeroDuration { .. })));
        assert!(matches!(parse("0.000000\n"), Err(Error::ZeroDuration { .. })));
    }

    #[test]
    fn test_parse_indeterminate_is_rejected() {
        assert!(matches!(parse("N/A\n"), Err(Error::Indeterminate { .. })));
    }

    #[test]
    fn test_parse_garbage_is_rejected() {
        assert!(matches!(parse(""), Err(Error::ParseError { .. })));
        assert!(matches!(parse("abc"), Err(Error::ParseError { .. })));
        assert!(matches!(parse("-3.5"), Err(Error::ParseError { .. })));
        assert!(matches!(parse("inf"), Err(Error::ParseError { .. })));
        assert!(matches!(parse("NaN"), Err(Error::ParseError { .. })));
    }

    #[cfg(unix)]
    mod fake_ffprobe {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable script standing in for ffprobe.
        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("ffprobe");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn reports_duration_on_success() {
            let dir = tempfile::tempdir().unwrap();
            let prober = FfprobeDuration::new(script(dir.path(), "echo 1.0"));
            let secs = prober.duration(Path::new("a.mp4")).await.unwrap();
            assert_eq!(secs, 1.0);
        }

        #[tokio::test]
        async fn receives_path_as_last_argument() {
            let dir = tempfile::tempdir().unwrap();
            let prober = FfprobeDuration::new(script(
                dir.path(),
                r#"for last; do :; done; [ "$last" = "it's a movie.mkv" ] && echo 42 || exit 1"#,
            ));
            let secs = prober.duration(Path::new("it's a movie.mkv")).await.unwrap();
            assert_eq!(secs, 42.0);
        }

        #[tokio::test]
        async fn non_utf8_file_name_is_passed_unchanged() {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let dir = tempfile::tempdir().unwrap();
            let media = dir.path().join(OsStr::from_bytes(b"caf\xe9.mkv"));
            std::fs::write(&media, b"Some nonsense").unwrap();
            let prober = FfprobeDuration::new(script(
                dir.path(),
                r#"for last; do :; done; [ -f "$last" ] && echo 42 || exit 1"#,
            ));

            let secs = prober.duration(&media).await.unwrap();
            assert_eq!(secs, 42.0);
        }

        #[tokio::test]
        async fn non_zero_exit_fails() {
            let dir = tempfile::tempdir().unwrap();
            let prober = FfprobeDuration::new(script(dir.path(), "echo 1.0; exit 1"));
            let result = prober.duration(Path::new("a.mp4")).await;
            assert!(matches!(result, Err(Error::ToolFailed { .. })));
        }

        #[tokio::test]
        async fn sentinel_output_fails() {
            let dir = tempfile::tempdir().unwrap();
            let prober = FfprobeDuration::new(script(dir.path(), "echo N/A"));
            let result = prober.duration(Path::new("a.mp4")).await;
            assert!(matches!(result, Err(Error::Indeterminate { .. })));
        }

        #[tokio::test]
        async fn hung_probe_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let prober = FfprobeDuration::new(script(dir.path(), "sleep 10"))
                .with_timeout(Some(Duration::from_millis(100)));
            let result = prober.duration(Path::new("a.mp4")).await;
            assert!(matches!(result, Err(Error::TimedOut { .. })));
        }

        #[test]
        fn discover_prefers_configured_path() {
            let dir = tempfile::tempdir().unwrap();
            let fake = script(dir.path(), "echo 1");
            let prober = FfprobeDuration::discover(Some(&fake)).unwrap();
            assert_eq!(prober.program(), fake.as_path());
        }
    }
}
