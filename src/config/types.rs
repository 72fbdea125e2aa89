use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ViddurError;

/// Defaults read from a `viddur.toml` file. Every key is optional and any
/// command-line flag overrides it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Maximum number of ffprobe processes running at once
    pub semaphore: Option<usize>,

    /// Duration format: "default", "s", "m", "h" or "d"
    pub format: Option<String>,

    /// Terminal width used for shortening file names
    pub width: Option<usize>,

    /// Disable pretty printing and shortening of file names
    pub simple_output: Option<bool>,

    /// Explicit ffprobe executable, instead of searching PATH
    pub ffprobe_path: Option<PathBuf>,

    /// Kill an ffprobe process that runs longer than this many seconds
    pub probe_timeout_secs: Option<u64>,
}

/// How durations are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// `HH:MM:SS`, prefixed with `D day, ` past one day.
    #[default]
    Default,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeFormat {
    /// Seconds per display unit, `None` for the clock-style format.
    pub fn unit_seconds(self) -> Option<f64> {
        match self {
            TimeFormat::Default => None,
            TimeFormat::Seconds => Some(1.0),
            TimeFormat::Minutes => Some(60.0),
            TimeFormat::Hours => Some(3_600.0),
            TimeFormat::Days => Some(86_400.0),
        }
    }

    /// Unit suffix, empty for the clock-style format.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeFormat::Default => "",
            TimeFormat::Seconds => "s",
            TimeFormat::Minutes => "m",
            TimeFormat::Hours => "h",
            TimeFormat::Days => "d",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    /// Accepts `default` or anything whose first letter names a unit, so
    /// `s`, `sec` and `Seconds` all select seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if lower == "default" {
            return Ok(TimeFormat::Default);
        }
        match lower.chars().next() {
            Some('s') => Ok(TimeFormat::Seconds),
            Some('m') => Ok(TimeFormat::Minutes),
            Some('h') => Ok(TimeFormat::Hours),
            Some('d') => Ok(TimeFormat::Days),
            _ => Err(format!(
                "invalid format '{s}' (choose from 'default', 's', 'm', 'h', 'd')"
            )),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Default => write!(f, "default"),
            other => write!(f, "{}", other.suffix()),
        }
    }
}

/// How much per-file output a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the bare total.
    Quiet,
    /// Failures and the labelled total.
    #[default]
    Default,
    /// Every file, then the labelled total.
    Verbose,
}

/// Ordering of the verbose report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Lines appear as probes finish.
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn is_sorted(self) -> bool {
        self != SortOrder::Unsorted
    }
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory or files to examine.
    pub paths: Vec<PathBuf>,
    /// Skip mime classification and probe every file.
    pub accept_all: bool,
    pub recursive: bool,
    /// Maximum number of probes in flight.
    pub semaphore: usize,
    pub output: OutputMode,
    pub sort: SortOrder,
    pub format: TimeFormat,
    /// Display width used to shorten file names.
    pub width: usize,
    pub simple_output: bool,
    pub ffprobe_path: Option<PathBuf>,
    /// `None` lets a probe run forever.
    pub probe_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            accept_all: false,
            recursive: false,
            semaphore: super::default_semaphore(),
            output: OutputMode::Default,
            sort: SortOrder::Unsorted,
            format: TimeFormat::Default,
            width: super::DEFAULT_WIDTH,
            simple_output: false,
            ffprobe_path: None,
            probe_timeout: None,
        }
    }
}

impl RunConfig {
    /// Check the cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ViddurError::Config`] when sorting is requested outside
    /// verbose mode or the semaphore has no permits.
    pub fn validate(&self) -> Result<(), ViddurError> {
        if self.sort.is_sorted() && self.output != OutputMode::Verbose {
            return Err(ViddurError::config(
                "You should use -v (--verbose) argument first for getting the output sorted",
            ));
        }

        if self.semaphore == 0 {
            return Err(ViddurError::config("--sem must be at least 1"));
        }

        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.output == OutputMode::Verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.output == OutputMode::Quiet
    }

    /// Whether per-file results are collected for a sorted report.
    pub fn defers_report(&self) -> bool {
        self.is_verbose() && self.sort.is_sorted()
    }
}
