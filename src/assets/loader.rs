//! Asset loading seam
//!
//! The watcher and the startup path only talk to [`AssetLoader`], so tests
//! can swap the file system for an in-memory fake.

use std::path::Path;

use super::Image;
use crate::error::AquariumError;

pub trait AssetLoader: Send + 'static {
    /// File names (not paths) in `dir`. A directory that cannot be read
    /// yields an empty listing.
    fn list(&self, dir: &Path) -> Vec<String>;

    /// Decode the image at `path`.
    fn load(&self, path: &Path) -> Result<Image, AquariumError>;
}

/// Loads images from disk with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl AssetLoader for FsLoader {
    fn list(&self, dir: &Path) -> Vec<String> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Cannot list '{}': {e}", dir.display());
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        // read_dir order is platform dependent
        names.sort();
        names
    }

    fn load(&self, path: &Path) -> Result<Image, AquariumError> {
        let decoded = image::open(path).map_err(|e| AquariumError::image_load(path, e))?;
        Ok(Image::from_rgba(decoded.into_rgba8()))
    }
}
