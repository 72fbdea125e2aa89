//! Report rendering.
//!
//! Turns per-file outcomes and the final total into display lines. Lines are
//! handed to a [`LineSink`] so the scanner never writes to stdout directly.

mod format;

pub use format::format_time;

use std::path::Path;

use crate::config::{RunConfig, TimeFormat};
use crate::scanner::ProbeOutcome;

/// Appended to shortened file names.
const PLACEHOLDER: &str = " ...";

/// Narrowest name column in pretty output.
const MIN_COLUMN: usize = 20;

/// Label printed before the total unless the run is quiet.
pub const TOTAL_LABEL: &str = "\nTotal Time is: ";

pub const NOT_MEDIA: &str = "is not recognized as a media.";
pub const PROBE_FAILED: &str = "cannot get examined.";

/// Destination for report lines.
pub trait LineSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Keeps lines in memory, in emission order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[cfg(test)]
impl LineSink for MemorySink {
    fn emit(&self, line: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(|p| p.into_inner());
        lines.push(line.to_string());
    }
}

/// Formats report lines for one run.
#[derive(Debug, Clone)]
pub struct Renderer {
    format: TimeFormat,
    width: usize,
    simple: bool,
}

impl Renderer {
    pub fn new(format: TimeFormat, width: usize, simple: bool) -> Self {
        Self {
            format,
            width,
            simple,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.format, config.width, config.simple_output)
    }

    /// One `path: detail` line.
    ///
    /// Pretty output quotes the path, shortens it to half the width and pads
    /// it to a quarter of the width (at least 20 columns).
    pub fn line(&self, path: &Path, detail: &str) -> String {
        let name = path.to_string_lossy();

        if self.simple {
            return format!("{name}: {detail}");
        }

        let short = shorten(&name, (self.width / 2).max(PLACEHOLDER.len()));
        let label = format!("{}:", quote(&short));
        let column = (self.width / 4).max(MIN_COLUMN);
        format!("{label:<column$} {detail}")
    }

    /// The line for one probe outcome.
    pub fn outcome_line(&self, path: &Path, outcome: ProbeOutcome) -> String {
        match outcome {
            ProbeOutcome::Duration(seconds) => self.line(path, &self.duration(seconds)),
            ProbeOutcome::NotMedia => self.line(path, NOT_MEDIA),
            ProbeOutcome::ProbeFailed => self.line(path, PROBE_FAILED),
        }
    }

    pub fn duration(&self, seconds: f64) -> String {
        format_time(seconds, self.format)
    }

    /// The closing line; quiet runs print the bare value.
    pub fn total_line(&self, total: f64, quiet: bool) -> String {
        if quiet {
            self.duration(total)
        } else {
            format!("{TOTAL_LABEL}{}", self.duration(total))
        }
    }
}

/// Collapse whitespace and fit `text` into `width` characters by dropping
/// trailing words and appending the placeholder. When not even the first word
/// fits, only the bare placeholder is left.
fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.len());
    let mut kept = String::new();
    let mut kept_len = 0;
    for word in words {
        let sep = usize::from(!kept.is_empty());
        let len = kept_len + sep + word.chars().count();
        if len > budget {
            break;
        }
        if sep == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
        kept_len = len;
    }

    if kept.is_empty() {
        PLACEHOLDER.trim_start().to_string()
    } else {
        format!("{kept}{PLACEHOLDER}")
    }
}

/// Quote a name the way a Python-style repr would: single quotes unless the
/// name contains one and no double quote.
fn quote(name: &str) -> String {
    if name.contains('\'') && !name.contains('"') {
        format!("\"{name}\"")
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}
