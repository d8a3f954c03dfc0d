//! Aquarium - an animated tank of bubbles, fish and draggable sprites
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entity store, motion, strokes, tick)
//! - `assets`: Image handles, file-system loader and the periodic asset watcher
//! - `renderer`: Draw list handed to an external renderer
//! - `platform`: Host abstraction and the blocking entry point
//! - `settings`: Paths, viewport and tuning loaded from JSON/env

pub mod assets;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::AquariumError;
pub use platform::{Host, run};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    use std::time::Duration;

    /// Highest speed a bubble or fish can have (lowest is 1)
    pub const MAX_SPEED: i32 = 2;

    /// Chance per eligible frame that a bubble pops before reaching the top
    pub const BUBBLE_DISAPPEAR_PROBABILITY: f64 = 0.0002;
    /// Chance that a drifting bubble reverses its drift
    pub const BUBBLE_DIRECTION_PROBABILITY: f64 = 0.3;
    /// A new bubble rises every this many frames
    pub const BUBBLE_SPAWN_INTERVAL: u64 = 50;
    /// Bubbles always start from this column
    pub const BUBBLE_SPAWN_X: i32 = 100;
    pub const BUBBLE_MIN_SCALE: f32 = 0.5;
    pub const BUBBLE_MAX_SCALE: f32 = 1.5;

    /// Chance per eligible frame that a fish turns around mid-tank
    pub const FISH_DIRECTION_PROBABILITY: f64 = 0.001;
    /// Chance per eligible frame that a fish tilts a little
    pub const FISH_ANGLE_PROBABILITY: f64 = 0.01;
    /// Speed random walk: below this draw slows down, above `1 - x` speeds up
    pub const FISH_SPEED_CHANGE_PROBABILITY: f64 = 0.05;
    /// Vertical pixels per frame per unit of tilt
    pub const FISH_ANGLE_FACTOR: f32 = 3.0;
    /// Skew moves in steps of 1/100
    pub const SKEW_STEP: f32 = 0.01;
    /// Skew bound expressed in steps (0.2)
    pub const SKEW_LIMIT_STEPS: i32 = 20;
    /// Freshly registered fish start slightly sheared (0.05)
    pub const INITIAL_SKEW_STEPS: i32 = 5;
    /// Largest initial tilt magnitude
    pub const FISH_MAX_INITIAL_ANGLE: f32 = 0.5;

    /// Alpha of a sprite while it is being dragged
    pub const DRAG_ALPHA: f32 = 0.5;

    /// How often the asset watcher rescans the asset folders
    pub const WATCH_INTERVAL: Duration = Duration::from_secs(60);
    /// Presentation cadence the host aims for
    pub const TARGET_FPS: u32 = 60;
}

/// True when an entity moving at `speed` advances on `frame`.
///
/// Faster entities use a smaller modulus and so move on more frames.
#[inline]
pub fn is_eligible_frame(frame: u64, speed: i32) -> bool {
    let modulus = (consts::MAX_SPEED + 2 - speed).max(1) as u64;
    frame % modulus == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_frame_cadence() {
        // speed 2 -> every 2nd frame, speed 1 -> every 3rd frame
        let fast: Vec<u64> = (1..=6).filter(|f| is_eligible_frame(*f, 2)).collect();
        let slow: Vec<u64> = (1..=6).filter(|f| is_eligible_frame(*f, 1)).collect();
        assert_eq!(fast, vec![2, 4, 6]);
        assert_eq!(slow, vec![3, 6]);
    }
}
