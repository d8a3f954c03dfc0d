//! Platform abstraction layer
//!
//! A [`Host`] owns the window (or lack of one): it reports the viewport,
//! hands over one input snapshot per frame, presents the resulting draw list
//! and decides when to stop. [`run`] wires the simulation to a host and
//! blocks until the host is done.

pub mod headless;

use std::sync::Arc;

use crate::assets::{AssetLoader, AssetWatcher, FsLoader};
use crate::error::AquariumError;
use crate::renderer::Frame;
use crate::settings::Settings;
use crate::sim::{Aquarium, Context, EntityStore, FrameInput, Viewport};

pub use headless::HeadlessHost;

pub trait Host {
    /// Size of the drawing area; read once at startup
    fn viewport(&self) -> Viewport;

    /// Input for the next frame, or `None` once the host wants to close
    fn next_frame(&mut self) -> Result<Option<FrameInput>, AquariumError>;

    /// Composite one frame
    fn present(&mut self, frame: &Frame) -> Result<(), AquariumError>;
}

/// Run the aquarium on `host` until it closes, loading assets from disk
pub fn run<H: Host>(settings: &Settings, host: &mut H) -> Result<(), AquariumError> {
    run_with_loader(settings, host, FsLoader)
}

/// [`run`] with a custom asset loader
pub fn run_with_loader<H, L>(
    settings: &Settings,
    host: &mut H,
    loader: L,
) -> Result<(), AquariumError>
where
    H: Host,
    L: AssetLoader,
{
    // Both startup images are mandatory
    let bubble_image = loader.load(&settings.bubble_image)?;
    let background_image = loader.load(&settings.background_image)?;

    let viewport = host.viewport();
    log::info!(
        "Viewport {}x{}, sprites from '{}', fish from '{}'",
        viewport.width,
        viewport.height,
        settings.sprites_dir.display(),
        settings.fishes_dir.display()
    );

    let ctx = Arc::new(Context {
        viewport,
        bubble_image,
        background_image,
    });
    let store = Arc::new(EntityStore::new());
    let seed = settings.seed_or_random();

    let watcher = AssetWatcher::new(
        loader,
        Arc::clone(&store),
        viewport,
        settings.sprites_dir.clone(),
        settings.fishes_dir.clone(),
        seed.wrapping_add(1),
    )
    .spawn(settings.scan_interval(), settings.scan_on_startup)?;

    let mut aquarium = Aquarium::new(ctx, store, seed);
    while let Some(input) = host.next_frame()? {
        let frame = aquarium.tick(&input);
        host.present(&frame)?;
    }

    log::info!("Host closed after {} frames", aquarium.frame_count());
    watcher.shutdown();
    Ok(())
}
