//! File system helpers
//!
//! Small wrappers used when locating and reading property files.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{AppConfigError, Result};

/// Check that a path exists and is a regular file
pub fn check_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AppConfigError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(AppConfigError::Config(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read a whole file as UTF-8 text
pub fn read_to_string(path: &Path) -> Result<String> {
    check_file_exists(path)?;

    fs::read_to_string(path).map_err(AppConfigError::Io)
}

/// Resolve a relative resource name against a list of roots.
///
/// Returns the first `root/name` that is an existing file. Absolute names are
/// returned as-is when they exist.
pub fn find_in_roots<P: AsRef<Path>>(name: &str, roots: &[P]) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    roots
        .iter()
        .map(|root| root.as_ref().join(candidate))
        .find(|path| path.is_file())
}
