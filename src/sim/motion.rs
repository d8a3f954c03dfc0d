//! Per-frame motion for bubbles and fish
//!
//! Both controllers are plain functions over one entity and an explicit
//! frame number, so a test can drive any frame sequence it likes. An entity
//! only moves on its eligible frames (see [`is_eligible_frame`]).

use rand::Rng;

use super::state::{Bubble, Direction, Fish, Viewport};
use crate::consts::*;
use crate::is_eligible_frame;

/// Outcome of advancing one bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleFate {
    Alive,
    /// Left through the top or popped at random; drop it
    Popped,
}

/// Advance a single bubble by one frame
pub fn advance_bubble<R: Rng + ?Sized>(
    bubble: &mut Bubble,
    frame: u64,
    image_height: i32,
    rng: &mut R,
) -> BubbleFate {
    if !is_eligible_frame(frame, bubble.speed) {
        return BubbleFate::Alive;
    }

    if bubble.pos.y <= -image_height || rng.random::<f64>() < BUBBLE_DISAPPEAR_PROBABILITY {
        return BubbleFate::Popped;
    }

    bubble.pos.y -= 1;

    // One frame in three also drifts sideways
    if rng.random_range(0..3) == 1 {
        if rng.random::<f64>() < BUBBLE_DIRECTION_PROBABILITY {
            bubble.direction.flip();
        }
        bubble.pos.x += bubble.direction.sign();
    }

    BubbleFate::Alive
}

/// Advance every bubble and drop the popped ones. Returns how many popped.
///
/// Each bubble is visited exactly once; removals never shift a bubble that
/// has not been processed yet.
pub fn advance_bubbles<R: Rng + ?Sized>(
    bubbles: &mut Vec<Bubble>,
    frame: u64,
    image_height: i32,
    rng: &mut R,
) -> usize {
    let before = bubbles.len();
    bubbles.retain_mut(|bubble| {
        advance_bubble(bubble, frame, image_height, rng) == BubbleFate::Alive
    });
    before - bubbles.len()
}

/// Advance a single fish by one frame
pub fn advance_fish<R: Rng + ?Sized>(
    fish: &mut Fish,
    frame: u64,
    viewport: &Viewport,
    rng: &mut R,
) {
    if !is_eligible_frame(frame, fish.speed) {
        return;
    }
    let extent = fish.image.size();

    // Bounce off the top/bottom, otherwise occasionally wobble
    if fish.pos.y <= 0 || fish.pos.y >= viewport.height - extent.y {
        fish.angle = -fish.angle;
    } else if rng.random::<f64>() < FISH_ANGLE_PROBABILITY {
        fish.angle += (rng.random::<f32>() - 0.5) / 2.0;
    }

    let roll = rng.random::<f64>();
    if roll < FISH_SPEED_CHANGE_PROBABILITY && fish.speed > 1 {
        fish.speed -= 1;
    } else if roll > 1.0 - FISH_SPEED_CHANGE_PROBABILITY && fish.speed < MAX_SPEED {
        fish.speed += 1;
    }

    let at_side = fish.pos.x <= 0 || fish.pos.x >= viewport.width - extent.x;
    if at_side || rng.random::<f64>() < FISH_DIRECTION_PROBABILITY {
        fish.direction.flip();
    }
    fish.pos.x += fish.direction.sign();
    fish.pos.y += (fish.angle * FISH_ANGLE_FACTOR).round() as i32;

    // Re-checked against the post-walk speed
    if is_eligible_frame(frame, fish.speed) {
        advance_skew(fish);
    }
}

/// Step the shear one hundredth, turning around at the bound
fn advance_skew(fish: &mut Fish) {
    let heading_out = fish.skew_steps * fish.skew_direction.sign() >= SKEW_LIMIT_STEPS;
    if heading_out {
        fish.skew_direction.flip();
    }
    fish.skew_steps += fish.skew_direction.sign();
}

/// Advance every fish in the school
pub fn advance_fishes<'a, R, I>(fishes: I, frame: u64, viewport: &Viewport, rng: &mut R)
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a mut Fish>,
{
    for fish in fishes {
        advance_fish(fish, frame, viewport, rng);
    }
}

impl Fish {
    /// True when the image is drawn mirrored (heading left)
    pub fn is_mirrored(&self) -> bool {
        self.direction == Direction::Negative
    }

    /// Rotation handed to the renderer (tilt follows heading)
    pub fn rotation(&self) -> f32 {
        self.direction.sign() as f32 * self.angle
    }
}
