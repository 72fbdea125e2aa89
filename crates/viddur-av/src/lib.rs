//! # viddur-av
//!
//! External tool plumbing for viddur.
//!
//! This crate provides:
//! - Discovery of the `ffprobe` executable (`PATH` lookup or an explicit override)
//! - An async [`ToolCommand`] runner built on `tokio::process`
//! - The [`DurationProber`] trait and its `ffprobe`-backed implementation
//!
//! ## Example
//!
//! ```no_run
//! use viddur_av::{DurationProber, FfprobeDuration};
//! use std::path::Path;
//!
//! # async fn example() -> viddur_av::Result<()> {
//! let prober = FfprobeDuration::discover(None)?;
//! let seconds = prober.duration(Path::new("/path/to/video.mkv")).await?;
//! println!("{seconds:.3}s");
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
pub mod probe;
pub mod tools;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use probe::{parse_duration, DurationProber, FfprobeDuration};
pub use tools::{get_tool_path, require_tool, FFPROBE};
