//! Error taxonomy
//!
//! Startup image failures are fatal and bubble up to the binary. The same
//! `ImageLoad` variant raised inside the asset watcher is transient: it is
//! logged and the file is retried on the next scan.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AquariumError {
    /// An image could not be opened or decoded
    ImageLoad { path: PathBuf, reason: String },
    /// The settings file exists but could not be read or parsed
    Settings { path: PathBuf, reason: String },
    /// The asset watcher thread could not be started
    Watcher(String),
    /// The host reported a failure while polling input or presenting a frame
    Host(String),
}

impl AquariumError {
    pub fn image_load(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::ImageLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for AquariumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, reason } => {
                write!(f, "failed to load image '{}': {reason}", path.display())
            }
            Self::Settings { path, reason } => {
                write!(f, "invalid settings file '{}': {reason}", path.display())
            }
            Self::Watcher(reason) => write!(f, "cannot start asset watcher: {reason}"),
            Self::Host(reason) => write!(f, "host error: {reason}"),
        }
    }
}

impl std::error::Error for AquariumError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = AquariumError::image_load("assets/bbl.png", "unexpected EOF");
        assert_eq!(
            err.to_string(),
            "failed to load image 'assets/bbl.png': unexpected EOF"
        );
    }
}
