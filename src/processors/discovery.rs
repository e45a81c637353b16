//! Input file discovery by glob pattern in natural sort order.

use std::path::PathBuf;

use glob::glob;
use log::{info, warn};
use thiserror::Error;

/// Errors that can occur while locating input files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Pattern could not detect file(s): {pattern}")]
    NoMatches { pattern: String },

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("Empty path pattern")]
    EmptyPattern,
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// A path pattern, either whole or as segments to be joined before globbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Single(String),
    Segments(Vec<String>),
}

impl PathPattern {
    /// The glob string this pattern expands to.
    pub fn to_glob(&self) -> Result<String> {
        match self {
            PathPattern::Single(pattern) => Ok(pattern.clone()),
            PathPattern::Segments(segments) => {
                if segments.is_empty() {
                    return Err(DiscoveryError::EmptyPattern);
                }
                let joined: PathBuf = segments.iter().collect();
                Ok(joined.to_string_lossy().into_owned())
            }
        }
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        PathPattern::Single(pattern.to_string())
    }
}

impl From<String> for PathPattern {
    fn from(pattern: String) -> Self {
        PathPattern::Single(pattern)
    }
}

impl From<Vec<String>> for PathPattern {
    fn from(segments: Vec<String>) -> Self {
        PathPattern::Segments(segments)
    }
}

/// Find all paths matching `pattern`, in natural alphanumeric order.
///
/// Files and directories are both returned, as with plain globbing.
/// Entries that cannot be read are skipped with a warning.
///
/// # Errors
///
/// Returns [`DiscoveryError::NoMatches`] when nothing matches, and
/// [`DiscoveryError::InvalidPattern`] for a malformed glob.
pub fn get_files(pattern: &PathPattern) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_glob()?;

    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!("Skipping unreadable path: {}", e),
        }
    }

    if files.is_empty() {
        return Err(DiscoveryError::NoMatches { pattern });
    }

    natural_sort(&mut files);
    info!("Found {} file(s) matching '{}'", files.len(), pattern);

    Ok(files)
}

/// Sort paths in natural alphanumeric order (`file2` before `file10`).
pub fn natural_sort(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natord::compare(&a.to_string_lossy(), &b.to_string_lossy()));
}
