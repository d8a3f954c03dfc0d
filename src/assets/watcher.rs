//! Periodic asset reconciliation
//!
//! Every interval the watcher lists the sprite and fish folders and registers
//! any file whose name the store does not know yet. A file that fails to
//! decode is logged and skipped; because eligibility is just "not in the
//! store", it is tried again on every later scan.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::loader::AssetLoader;
use crate::error::AquariumError;
use crate::sim::{EntityStore, Fish, Viewport};

pub struct AssetWatcher<L: AssetLoader> {
    loader: L,
    store: Arc<EntityStore>,
    viewport: Viewport,
    sprites_dir: PathBuf,
    fishes_dir: PathBuf,
    rng: Pcg32,
}

impl<L: AssetLoader> AssetWatcher<L> {
    pub fn new(
        loader: L,
        store: Arc<EntityStore>,
        viewport: Viewport,
        sprites_dir: impl Into<PathBuf>,
        fishes_dir: impl Into<PathBuf>,
        seed: u64,
    ) -> Self {
        Self {
            loader,
            store,
            viewport,
            sprites_dir: sprites_dir.into(),
            fishes_dir: fishes_dir.into(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Register sprites for new files in the sprite folder. Returns how many were added.
    pub fn scan_sprites(&mut self) -> usize {
        let mut added = 0;
        for name in self.loader.list(&self.sprites_dir) {
            if self.store.has_sprite(&name) {
                continue;
            }
            let path = self.sprites_dir.join(&name);
            let image = match self.loader.load(&path) {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Skipping sprite: {e}");
                    continue;
                }
            };
            let pos = self.viewport.random_position(image.size(), &mut self.rng);
            if self.store.register_sprite_if_absent(&name, image, pos).is_some() {
                log::info!("New sprite '{name}' at {pos}");
                added += 1;
            }
        }
        added
    }

    /// Register fish for new files in the fish folder. Returns how many were added.
    pub fn scan_fishes(&mut self) -> usize {
        let mut added = 0;
        for name in self.loader.list(&self.fishes_dir) {
            if self.store.has_fish(&name) {
                continue;
            }
            let path = self.fishes_dir.join(&name);
            let image = match self.loader.load(&path) {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Skipping fish: {e}");
                    continue;
                }
            };
            let fish = Fish::random(name.as_str(), image, &self.viewport, &mut self.rng);
            let pos = fish.pos;
            if self.store.register_fish_if_absent(fish) {
                log::info!("New fish '{name}' at {pos}");
                added += 1;
            }
        }
        added
    }

    pub fn scan(&mut self) -> usize {
        self.scan_sprites() + self.scan_fishes()
    }

    /// Move the watcher onto its own thread, scanning every `interval`.
    ///
    /// The thread runs until the returned handle is dropped or shut down.
    pub fn spawn(
        mut self,
        interval: Duration,
        scan_on_startup: bool,
    ) -> Result<WatcherHandle, AquariumError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("asset-watcher".into())
            .spawn(move || {
                if scan_on_startup {
                    self.scan();
                }
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            self.scan();
                        }
                        // Stop requested or handle dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("Asset watcher stopped");
            })
            .map_err(|e| AquariumError::Watcher(e.to_string()))?;

        Ok(WatcherHandle {
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

/// Keeps the watcher thread alive; dropping it stops and joins the thread
pub struct WatcherHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Asset watcher thread panicked");
            }
        }
    }
}
