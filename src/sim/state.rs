//! Entity types and the shared simulation context
//!
//! Sprites are named and draggable, bubbles are anonymous and transient,
//! fish are named and wander on their own.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::Image;
use crate::consts::*;

/// Fixed drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Largest top-left position that keeps an image of `extent` fully visible.
    /// Images larger than the viewport are pinned to the origin.
    pub fn max_position(&self, extent: IVec2) -> IVec2 {
        (self.size() - extent).max(IVec2::ZERO)
    }

    /// Clamp a top-left position into `[0, viewport - extent]` on both axes
    pub fn clamp_position(&self, pos: IVec2, extent: IVec2) -> IVec2 {
        pos.clamp(IVec2::ZERO, self.max_position(extent))
    }

    /// Uniformly random position with the whole image inside the viewport
    pub fn random_position<R: Rng + ?Sized>(&self, extent: IVec2, rng: &mut R) -> IVec2 {
        let max = self.max_position(extent);
        IVec2::new(rng.random_range(0..=max.x), rng.random_range(0..=max.y))
    }
}

/// Horizontal heading (and skew heading for fish); always -1 or +1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Negative => -1,
            Direction::Positive => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Negative => Direction::Positive,
            Direction::Positive => Direction::Negative,
        }
    }

    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

/// Uniform speed in `[1, MAX_SPEED]`
pub fn random_speed<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(1..=MAX_SPEED)
}

/// Stable handle to a sprite, independent of its place in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

/// A background sprite the user can pick up and move
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    /// Source file name, unique among sprites
    pub name: String,
    pub image: Image,
    /// Top-left corner
    pub pos: IVec2,
}

impl Sprite {
    /// Hit-test against the image's alpha channel
    pub fn contains(&self, point: IVec2) -> bool {
        self.image.is_opaque_at(point - self.pos)
    }

    /// Move by `delta`, keeping the whole image inside the viewport
    pub fn move_by(&mut self, delta: IVec2, viewport: &Viewport) {
        self.pos = viewport.clamp_position(self.pos + delta, self.image.size());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(pub u64);

/// A rising bubble. All bubbles share the context's bubble image.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub pos: IVec2,
    pub direction: Direction,
    /// Fixed at spawn, in `[1, MAX_SPEED]`
    pub speed: i32,
    pub scale: f32,
}

/// A fish swimming across the tank
#[derive(Debug, Clone)]
pub struct Fish {
    /// Source file name, unique among fish
    pub name: String,
    pub image: Image,
    pub pos: IVec2,
    pub direction: Direction,
    /// Random walk within `[1, MAX_SPEED]`
    pub speed: i32,
    /// Body tilt; its sign is the vertical tendency
    pub angle: f32,
    /// Shear in hundredths, within `[-SKEW_LIMIT_STEPS, SKEW_LIMIT_STEPS]`
    pub skew_steps: i32,
    pub skew_direction: Direction,
}

impl Fish {
    /// A new fish with randomized placement and kinematics
    pub fn random<R: Rng + ?Sized>(
        name: impl Into<String>,
        image: Image,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Self {
        let pos = viewport.random_position(image.size(), rng);
        let tilt = rng.random_range(0.0..FISH_MAX_INITIAL_ANGLE);
        let angle = tilt * Direction::random(rng).sign() as f32;
        Self {
            name: name.into(),
            image,
            pos,
            direction: Direction::random(rng),
            speed: random_speed(rng),
            angle,
            skew_steps: INITIAL_SKEW_STEPS,
            skew_direction: Direction::Positive,
        }
    }

    /// Current shear factor
    #[inline]
    pub fn skew(&self) -> f32 {
        self.skew_steps as f32 * SKEW_STEP
    }
}

/// Read-only state shared by every component of one simulation
#[derive(Debug, Clone)]
pub struct Context {
    pub viewport: Viewport,
    pub bubble_image: Image,
    pub background_image: Image,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp_keeps_extent_inside() {
        let viewport = Viewport::new(800, 600);
        let extent = IVec2::new(40, 40);
        assert_eq!(
            viewport.clamp_position(IVec2::new(790, 10), extent),
            IVec2::new(760, 10)
        );
        assert_eq!(
            viewport.clamp_position(IVec2::new(-5, 700), extent),
            IVec2::new(0, 560)
        );
    }

    #[test]
    fn test_oversized_image_pinned_to_origin() {
        let viewport = Viewport::new(100, 100);
        let extent = IVec2::new(150, 50);
        assert_eq!(viewport.max_position(extent), IVec2::new(0, 50));
    }

    #[test]
    fn test_random_position_in_bounds() {
        let viewport = Viewport::new(200, 100);
        let extent = IVec2::new(50, 30);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let p = viewport.random_position(extent, &mut rng);
            assert!(p.x >= 0 && p.x <= 150);
            assert!(p.y >= 0 && p.y <= 70);
        }
    }

    #[test]
    fn test_sprite_move_by() {
        let viewport = Viewport::new(800, 600);
        let mut sprite = Sprite {
            id: SpriteId(1),
            name: "rock.png".into(),
            image: Image::solid(40, 40),
            pos: IVec2::new(10, 10),
        };
        sprite.move_by(IVec2::new(40, 50), &viewport);
        assert_eq!(sprite.pos, IVec2::new(50, 60));
        sprite.move_by(IVec2::new(-100, 1000), &viewport);
        assert_eq!(sprite.pos, IVec2::new(0, 560));
    }

    #[test]
    fn test_random_fish_initial_state() {
        let viewport = Viewport::new(640, 480);
        let mut rng = Pcg32::seed_from_u64(42);
        for i in 0..200 {
            let image = Image::solid(30, 20);
            let fish = Fish::random(format!("fish{i}.png"), image, &viewport, &mut rng);
            assert!((1..=MAX_SPEED).contains(&fish.speed));
            assert!(fish.angle.abs() < FISH_MAX_INITIAL_ANGLE);
            assert_eq!(fish.skew_steps, INITIAL_SKEW_STEPS);
            assert!((fish.skew() - 0.05).abs() < 1e-6);
            assert_eq!(fish.skew_direction, Direction::Positive);
            assert!(fish.pos.x <= 610 && fish.pos.y <= 460);
        }
    }

    #[test]
    fn test_direction_flip() {
        let mut d = Direction::Positive;
        d.flip();
        assert_eq!(d, Direction::Negative);
        assert_eq!(d.sign(), -1);
        assert_eq!(d.flipped().sign(), 1);
    }
}
