//! Images and asset discovery
//!
//! - `handle`: cheap-to-clone decoded image with alpha lookups
//! - `loader`: directory listing + decoding seam, with a file-system impl
//! - `watcher`: background thread that registers new sprites and fish

pub mod handle;
pub mod loader;
pub mod watcher;

pub use handle::Image;
pub use loader::{AssetLoader, FsLoader};
pub use watcher::{AssetWatcher, WatcherHandle};
