//! Frame orchestration
//!
//! One call to [`Aquarium::tick`] is one presented frame:
//! input -> strokes -> spawn -> motion -> draw list.

use std::collections::HashSet;
use std::sync::Arc;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::motion::{advance_bubbles, advance_fishes};
use super::state::{Context, Direction, SpriteId, random_speed};
use super::store::EntityStore;
use super::stroke::{DragTarget, FrameInput, Stroke, StrokeSource};
use crate::consts::*;
use crate::renderer::{DrawOp, Frame, Layer};

/// The running simulation: frame counter, live strokes and the RNG that
/// drives all motion. Entities themselves live in the shared [`EntityStore`].
pub struct Aquarium {
    ctx: Arc<Context>,
    store: Arc<EntityStore>,
    strokes: Vec<Stroke>,
    /// Frames processed so far; never reset
    frame: u64,
    rng: Pcg32,
}

impl Aquarium {
    pub fn new(ctx: Arc<Context>, store: Arc<EntityStore>, seed: u64) -> Self {
        Self {
            ctx,
            store,
            strokes: Vec::new(),
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Strokes that have not been released yet
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Advance the simulation by one frame and describe what to draw
    pub fn tick(&mut self, input: &FrameInput) -> Frame {
        self.frame += 1;

        self.begin_strokes(input);
        self.update_strokes(input);

        if self.frame % BUBBLE_SPAWN_INTERVAL == 0 {
            self.spawn_bubble();
        }

        self.advance_entities();
        self.build_frame()
    }

    /// Sprites currently carried by a stroke
    fn held_sprites(&self) -> HashSet<SpriteId> {
        self.strokes.iter().filter_map(Stroke::dragged_sprite).collect()
    }

    /// Open a stroke for every new press/touch and pick up the sprite under it.
    ///
    /// Every begin event opens a stroke the same frame. A touch reported
    /// without a position opens one at the origin that carries no sprite.
    fn begin_strokes(&mut self, input: &FrameInput) {
        let mut sources = Vec::new();
        if input.mouse_just_pressed {
            sources.push(StrokeSource::Mouse);
        }
        sources.extend(input.touches_began.iter().map(|id| StrokeSource::Touch(*id)));
        if sources.is_empty() {
            return;
        }

        // A sprite already in someone's hand cannot be grabbed again
        let mut held = self.held_sprites();
        let layer = self.store.sprites();
        for source in sources {
            let Some(start) = source.position(input) else {
                log::debug!("{source:?} began without a position");
                self.strokes.push(Stroke::new(source, IVec2::ZERO));
                continue;
            };
            let mut stroke = Stroke::new(source, start);
            if let Some(id) = layer.topmost_at(start, &held) {
                held.insert(id);
                stroke.attach(DragTarget::Sprite(id));
            }
            self.strokes.push(stroke);
        }
    }

    /// Poll every stroke; commit and drop the ones released this frame
    fn update_strokes(&mut self, input: &FrameInput) {
        let viewport = self.ctx.viewport;
        let store = &self.store;

        self.strokes.retain_mut(|stroke| {
            stroke.update(input);
            if !stroke.is_released() {
                return true;
            }

            if let Some(DragTarget::Sprite(id)) = stroke.detach() {
                let mut layer = store.sprites();
                if let Some(sprite) = layer.get_mut(id) {
                    sprite.move_by(stroke.delta(), &viewport);
                    log::debug!("Dropped '{}' at {}", sprite.name, sprite.pos);
                    layer.promote(id);
                }
            }
            false
        });
    }

    fn spawn_bubble(&mut self) {
        let pos = IVec2::new(BUBBLE_SPAWN_X, self.ctx.viewport.height);
        let direction = Direction::random(&mut self.rng);
        let speed = random_speed(&mut self.rng);
        let scale = self.rng.random_range(BUBBLE_MIN_SCALE..=BUBBLE_MAX_SCALE);
        self.store.spawn_bubble(pos, direction, speed, scale);
    }

    fn advance_entities(&mut self) {
        let frame = self.frame;
        {
            let mut bubbles = self.store.bubbles();
            advance_bubbles(
                &mut bubbles,
                frame,
                self.ctx.bubble_image.height(),
                &mut self.rng,
            );
        }
        let mut school = self.store.fishes();
        advance_fishes(school.iter_mut(), frame, &self.ctx.viewport, &mut self.rng);
    }

    fn build_frame(&self) -> Frame {
        let mut frame = Frame::new(self.frame);

        // Background stretched over the whole viewport, behind everything
        let background = &self.ctx.background_image;
        let stretch =
            self.ctx.viewport.size().as_vec2() / background.size().as_vec2().max(Vec2::ONE);
        frame.push(
            Layer::Background,
            background,
            DrawOp::at(Vec2::ZERO).with_scale(stretch),
        );

        {
            let held = self.held_sprites();
            let layer = self.store.sprites();
            for sprite in layer.iter().filter(|s| !held.contains(&s.id)) {
                frame.push(Layer::Sprite, &sprite.image, DrawOp::at(sprite.pos.as_vec2()));
            }
            for stroke in &self.strokes {
                let Some(sprite) = stroke.dragged_sprite().and_then(|id| layer.get(id)) else {
                    continue;
                };
                let pos = sprite.pos + stroke.delta();
                frame.push(
                    Layer::DraggedSprite,
                    &sprite.image,
                    DrawOp::at(pos.as_vec2()).with_alpha(DRAG_ALPHA),
                );
            }
        }

        for bubble in self.store.bubbles().iter() {
            frame.push(
                Layer::Bubble,
                &self.ctx.bubble_image,
                DrawOp::at(bubble.pos.as_vec2()).with_scale(Vec2::splat(bubble.scale)),
            );
        }

        for fish in self.store.fishes().iter() {
            let op = DrawOp {
                mirror: fish.is_mirrored(),
                shear: Some(fish.skew()),
                rotation: Some(fish.rotation()),
                centered: true,
                ..DrawOp::at(fish.pos.as_vec2())
            };
            frame.push(Layer::Fish, &fish.image, op);
        }

        frame
    }
}
