//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the media probing executable.
pub const FFPROBE: &str = "ffprobe";

/// Require that a tool is available on `PATH`, returning its path.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over `PATH` lookup.
///
/// A configured path that does not exist is ignored and the lookup falls
/// back to `PATH`.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {} does not exist, searching PATH",
            name,
            path.display()
        );
    }

    require_tool(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_tool_not_found() {
        let result = require_tool("nonexistent_tool_12345");
        assert!(matches!(result, Err(Error::ToolNotFound { ref tool }) if tool == "nonexistent_tool_12345"));
    }

    #[test]
    fn test_get_tool_path_prefers_existing_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("my-ffprobe");
        std::fs::write(&fake, b"").unwrap();

        let resolved = get_tool_path("nonexistent_tool_12345", Some(&fake)).unwrap();
        assert_eq!(resolved, fake);
    }

    #[test]
    fn test_get_tool_path_missing_config_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-here");

        let result = get_tool_path("nonexistent_tool_12345", Some(&missing));
        assert!(result.is_err());
    }
}
