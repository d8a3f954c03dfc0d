//! Aquarium entry point
//!
//! Resolves settings (file, then `.env` and environment, then command line)
//! and runs the simulation on the headless host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use aquarium::Settings;
use aquarium::platform::{HeadlessHost, run};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Animated aquarium of bubbles, fish and draggable sprites",
    long_about = None
)]
struct Cli {
    /// Fixed background image (overrides BGIMAGE)
    background_image: Option<PathBuf>,
    /// Folder of draggable background sprites (overrides BGSFOLDER)
    sprites_dir: Option<PathBuf>,
    /// Folder of fish images (overrides FGSFOLDER)
    fishes_dir: Option<PathBuf>,

    /// Settings file
    #[arg(short, long, default_value = Settings::DEFAULT_PATH)]
    config: PathBuf,
    /// Stop after this many frames
    #[arg(short = 'n', long)]
    max_frames: Option<u64>,
    /// Log frames per second
    #[arg(long)]
    fps: bool,
}

impl Cli {
    fn resolve_settings(self) -> Result<Settings> {
        let mut settings = Settings::load(&self.config)?;
        settings.apply_env();

        if let Some(path) = self.background_image {
            settings.background_image = path;
        }
        if let Some(path) = self.sprites_dir {
            settings.sprites_dir = path;
        }
        if let Some(path) = self.fishes_dir {
            settings.fishes_dir = path;
        }
        if self.max_frames.is_some() {
            settings.max_frames = self.max_frames;
        }
        settings.log_fps |= self.fps;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    Settings::load_dotenv(Path::new(Settings::DOTENV_PATH));
    let settings = Cli::parse().resolve_settings()?;
    log::info!("Aquarium starting (background '{}')", settings.background_image.display());

    let mut host = HeadlessHost::new(&settings);
    run(&settings, &mut host).context("aquarium stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_paths_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("aquarium.json");
        let cli = Cli::try_parse_from([
            "aquarium",
            "bg.png",
            "sprites",
            "fish",
            "--config",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        let settings = cli.resolve_settings().unwrap();
        assert_eq!(settings.background_image, PathBuf::from("bg.png"));
        assert_eq!(settings.sprites_dir, PathBuf::from("sprites"));
        assert_eq!(settings.fishes_dir, PathBuf::from("fish"));
    }

    #[test]
    fn test_options() {
        let cli =
            Cli::try_parse_from(["aquarium", "-c", "tank.json", "-n", "120", "--fps"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("tank.json"));
        assert_eq!(cli.max_frames, Some(120));
        assert!(cli.fps);
        assert!(cli.background_image.is_none());
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["aquarium"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(Settings::DEFAULT_PATH));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["aquarium", "--config"]).is_err());
        assert!(Cli::try_parse_from(["aquarium", "--bogus"]).is_err());
        assert!(Cli::try_parse_from(["aquarium", "-n", "many"]).is_err());
        assert!(Cli::try_parse_from(["aquarium", "a", "b", "c", "d"]).is_err());
    }
}
