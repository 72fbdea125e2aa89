mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Width assumed when the terminal size cannot be detected.
pub const DEFAULT_WIDTH: usize = 80;

/// Default locations searched for a defaults file, in order.
const DEFAULT_PATHS: &[&str] = &["./viddur.toml", "~/.config/viddur/config.toml"];

/// Load defaults from a TOML file
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(format) = &config.format {
        format
            .parse::<TimeFormat>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid format in config file: {:?}", path))?;
    }

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Load defaults from an explicit path, else the first default location that
/// exists, else empty defaults
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(FileConfig::default())
}

/// Two probes per CPU; the work is process spawns and pipe reads.
pub fn default_semaphore() -> usize {
    num_cpus::get() * 2
}

/// Width of the attached terminal, or [`DEFAULT_WIDTH`].
pub fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}
