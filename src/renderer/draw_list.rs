//! Draw list produced once per frame
//!
//! The simulation never touches pixels. It emits an ordered list of
//! commands, back to front, and the host's renderer composites them.

use glam::Vec2;

use crate::assets::Image;

/// What a command is drawing (lets hosts and tests reason about order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Sprite,
    /// A sprite carried by an active stroke
    DraggedSprite,
    Bubble,
    Fish,
}

/// Transform and blending for one image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOp {
    /// Final translation in viewport pixels
    pub translate: Vec2,
    /// Per-axis scale applied first
    pub scale: Option<Vec2>,
    /// Flip horizontally around the image's own extent
    pub mirror: bool,
    /// Vertical shear factor (y += shear * x)
    pub shear: Option<f32>,
    /// Rotation in radians around the image centre
    pub rotation: Option<f32>,
    /// Draw centred on `translate` instead of top-left
    pub centered: bool,
    /// Alpha multiplier
    pub alpha: f32,
}

impl DrawOp {
    /// Plain top-left placement at full opacity
    pub fn at(translate: Vec2) -> Self {
        Self {
            translate,
            scale: None,
            mirror: false,
            shear: None,
            rotation: None,
            centered: false,
            alpha: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub layer: Layer,
    pub image: Image,
    pub op: DrawOp,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Frame counter value this list was produced on
    pub index: u64,
    /// Back to front
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(index: u64) -> Self {
        Self {
            index,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: Layer, image: &Image, op: DrawOp) {
        self.commands.push(DrawCommand {
            layer,
            image: image.clone(),
            op,
        });
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer == layer)
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.layer(layer).count()
    }
}
