//! Frame-driven simulation module
//!
//! Everything that moves lives here. The module is free of I/O:
//! - The frame counter and RNG are explicit, so runs are reproducible
//! - Input arrives as a per-frame snapshot
//! - Output is a draw list, never pixels

pub mod motion;
pub mod state;
pub mod store;
pub mod stroke;
pub mod tick;

pub use motion::{BubbleFate, advance_bubble, advance_bubbles, advance_fish, advance_fishes};
pub use state::{
    Bubble, BubbleId, Context, Direction, Fish, Sprite, SpriteId, Viewport, random_speed,
};
pub use store::{EntityStore, School, SpriteLayer};
pub use stroke::{DragTarget, FrameInput, Stroke, StrokePhase, StrokeSource, TouchId};
pub use tick::Aquarium;
