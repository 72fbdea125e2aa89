use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use viddur::config::{self, FileConfig, OutputMode, RunConfig, SortOrder, TimeFormat};
use viddur::ViddurError;

#[derive(Parser, Debug)]
#[command(name = "viddur")]
#[command(
    author,
    version,
    about = "Sum the duration of the videos in a directory or a list of files",
    after_help = "ffprobe must be installed and reachable through PATH (or --ffprobe)."
)]
pub struct Cli {
    /// Select desired directory or files, default is $PWD
    #[arg(value_name = "PATH")]
    pub path_file: Vec<PathBuf>,

    /// Don't guess mime types and take all files as videos
    #[arg(short, long)]
    pub all: bool,

    /// Format the duration in [s]econds/[m]inutes/[h]ours/[d]ays or [default]
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<TimeFormat>,

    /// Show duration of videos in directories and their contents recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Limit the number of ffprobe processes running at once
    #[arg(long = "sem", visible_alias = "semaphore", value_name = "N")]
    pub semaphore: Option<usize>,

    /// Width of your terminal (for shortening file names)
    #[arg(short, long, value_name = "N")]
    pub width: Option<usize>,

    /// Disable pretty printing and shortening of file names
    #[arg(long)]
    pub simple_output: bool,

    /// Show the duration of every file too
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print only the total duration, without any further explanation
    #[arg(short, long)]
    pub quiet: bool,

    /// Sort verbose output in ascending order
    #[arg(short, long, conflicts_with = "reverse")]
    pub sort: bool,

    /// Sort verbose output in descending order
    #[arg(long)]
    pub reverse: bool,

    /// Path to the ffprobe executable
    #[arg(long, env = "VIDDUR_FFPROBE", value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Kill ffprobe runs that take longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to a TOML file with default settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<TimeFormat, String> {
    s.parse()
}

impl Cli {
    /// Merge the flags over the file defaults into a validated run config.
    pub fn into_run_config(self, file: FileConfig) -> Result<RunConfig, ViddurError> {
        let format = match (self.format, file.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => name.parse().map_err(ViddurError::config)?,
            (None, None) => TimeFormat::Default,
        };

        let output = if self.verbose {
            OutputMode::Verbose
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Default
        };

        let sort = if self.sort {
            SortOrder::Ascending
        } else if self.reverse {
            SortOrder::Descending
        } else {
            SortOrder::Unsorted
        };

        let run = RunConfig {
            paths: self.path_file,
            accept_all: self.all,
            recursive: self.recursive,
            semaphore: self
                .semaphore
                .or(file.semaphore)
                .unwrap_or_else(config::default_semaphore),
            output,
            sort,
            format,
            width: self
                .width
                .or(file.width)
                .unwrap_or_else(config::terminal_width),
            simple_output: self.simple_output || file.simple_output.unwrap_or(false),
            ffprobe_path: self.ffprobe.or(file.ffprobe_path),
            probe_timeout: self
                .timeout
                .or(file.probe_timeout_secs)
                .map(Duration::from_secs),
        };

        run.validate()?;
        Ok(run)
    }
}
