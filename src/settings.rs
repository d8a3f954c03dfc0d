//! Aquarium settings
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables, then by command-line paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{TARGET_FPS, WATCH_INTERVAL};
use crate::error::AquariumError;
use crate::sim::Viewport;

/// Environment variable naming the fixed background image
pub const ENV_BACKGROUND_IMAGE: &str = "BGIMAGE";
/// Environment variable naming the background-sprite folder
pub const ENV_SPRITES_DIR: &str = "BGSFOLDER";
/// Environment variable naming the fish folder
pub const ENV_FISHES_DIR: &str = "FGSFOLDER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Assets ===
    /// Fixed background drawn behind everything
    pub background_image: PathBuf,
    /// Image shared by all bubbles
    pub bubble_image: PathBuf,
    /// Folder watched for draggable sprites
    pub sprites_dir: PathBuf,
    /// Folder watched for fish
    pub fishes_dir: PathBuf,

    // === Display ===
    pub viewport: Viewport,
    /// Presentation rate the headless host paces to
    pub target_fps: u32,
    /// Log measured FPS once per second
    pub log_fps: bool,
    /// Stop after this many frames (headless runs)
    pub max_frames: Option<u64>,

    // === Simulation ===
    /// Seconds between asset folder scans
    pub scan_interval_secs: u64,
    /// Scan once immediately instead of waiting a full interval
    pub scan_on_startup: bool,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_image: PathBuf::from("assets/bg.png"),
            bubble_image: PathBuf::from("assets/bbl.png"),
            sprites_dir: PathBuf::from("assets/sprites"),
            fishes_dir: PathBuf::from("assets/fishes"),

            viewport: Viewport::default(),
            target_fps: TARGET_FPS,
            log_fps: false,
            max_frames: None,

            scan_interval_secs: WATCH_INTERVAL.as_secs(),
            scan_on_startup: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Default settings file name, looked up in the working directory
    pub const DEFAULT_PATH: &'static str = "aquarium.json";
    /// Environment file read before the variables are applied
    pub const DOTENV_PATH: &'static str = ".env";

    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, AquariumError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at '{}', using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AquariumError::Settings {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let settings: Self = serde_json::from_str(&json).map_err(|e| AquariumError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::info!("Loaded settings from '{}'", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), AquariumError> {
        let to_error = |reason: String| AquariumError::Settings {
            path: path.to_path_buf(),
            reason,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| to_error(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| to_error(e.to_string()))?;
        log::info!("Settings saved to '{}'", path.display());
        Ok(())
    }

    /// Export the variables of a `.env` file into the process environment.
    /// Variables already set are kept. Returns false if nothing was loaded.
    pub fn load_dotenv(path: &Path) -> bool {
        match dotenvy::from_path(path) {
            Ok(()) => {
                log::info!("Loaded environment from '{}'", path.display());
                true
            }
            Err(e) if e.not_found() => {
                log::debug!("No environment file at '{}'", path.display());
                false
            }
            Err(e) => {
                log::warn!("Ignoring environment file '{}': {e}", path.display());
                false
            }
        }
    }

    /// Override asset paths from `BGIMAGE`, `BGSFOLDER` and `FGSFOLDER`
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        if let Some(path) = get(ENV_BACKGROUND_IMAGE) {
            self.background_image = path;
        }
        if let Some(path) = get(ENV_SPRITES_DIR) {
            self.sprites_dir = path;
        }
        if let Some(path) = get(ENV_FISHES_DIR) {
            self.fishes_dir = path;
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    /// Time budget of one frame at `target_fps`
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Configured seed, or a fresh one from the OS
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}
