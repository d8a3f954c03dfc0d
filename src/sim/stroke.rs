//! Drag interaction tracking
//!
//! A [`Stroke`] follows one pointer or one touch from press to release.
//! Strokes start `Active` and end `Released`; they never come back.

use std::collections::HashMap;

use glam::IVec2;

use super::state::SpriteId;

pub type TouchId = u64;

/// Input snapshot for a single frame (supplied by the host)
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer position in viewport pixels
    pub cursor: IVec2,
    /// Primary button went down this frame
    pub mouse_just_pressed: bool,
    /// Primary button went up this frame
    pub mouse_just_released: bool,
    /// Position of every touch currently on the surface
    pub touches: HashMap<TouchId, IVec2>,
    /// Touches that began this frame
    pub touches_began: Vec<TouchId>,
    /// Touches that ended this frame
    pub touches_released: Vec<TouchId>,
}

impl FrameInput {
    /// Pointer at `pos` with no button edges
    pub fn cursor_at(pos: IVec2) -> Self {
        Self {
            cursor: pos,
            ..Default::default()
        }
    }

    pub fn mouse_pressed_at(pos: IVec2) -> Self {
        Self {
            cursor: pos,
            mouse_just_pressed: true,
            ..Default::default()
        }
    }

    pub fn mouse_released_at(pos: IVec2) -> Self {
        Self {
            cursor: pos,
            mouse_just_released: true,
            ..Default::default()
        }
    }
}

/// Where a stroke reads its position and release from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeSource {
    Mouse,
    Touch(TouchId),
}

impl StrokeSource {
    /// Current position, if the source is still reporting one
    pub fn position(&self, input: &FrameInput) -> Option<IVec2> {
        match self {
            StrokeSource::Mouse => Some(input.cursor),
            StrokeSource::Touch(id) => input.touches.get(id).copied(),
        }
    }

    pub fn is_just_released(&self, input: &FrameInput) -> bool {
        match self {
            StrokeSource::Mouse => input.mouse_just_released,
            StrokeSource::Touch(id) => input.touches_released.contains(id),
        }
    }
}

/// Entity a stroke is carrying. Sprites are the only draggable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    Sprite(SpriteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePhase {
    Active,
    Released,
}

#[derive(Debug, Clone)]
pub struct Stroke {
    source: StrokeSource,
    /// Position when the press began
    initial: IVec2,
    /// Last position reported while active
    current: IVec2,
    phase: StrokePhase,
    target: Option<DragTarget>,
}

impl Stroke {
    pub fn new(source: StrokeSource, start: IVec2) -> Self {
        Self {
            source,
            initial: start,
            current: start,
            phase: StrokePhase::Active,
            target: None,
        }
    }

    /// Poll the source: either latch the release or refresh the position
    pub fn update(&mut self, input: &FrameInput) {
        if self.phase == StrokePhase::Released {
            return;
        }
        if self.source.is_just_released(input) {
            self.phase = StrokePhase::Released;
            return;
        }
        if let Some(pos) = self.source.position(input) {
            self.current = pos;
        }
    }

    pub fn source(&self) -> StrokeSource {
        self.source
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_released(&self) -> bool {
        self.phase == StrokePhase::Released
    }

    pub fn initial_position(&self) -> IVec2 {
        self.initial
    }

    pub fn position(&self) -> IVec2 {
        self.current
    }

    /// Offset travelled since the press
    pub fn delta(&self) -> IVec2 {
        self.current - self.initial
    }

    pub fn target(&self) -> Option<DragTarget> {
        self.target
    }

    pub fn dragged_sprite(&self) -> Option<SpriteId> {
        match self.target {
            Some(DragTarget::Sprite(id)) => Some(id),
            None => None,
        }
    }

    pub fn attach(&mut self, target: DragTarget) {
        self.target = Some(target);
    }

    /// Let go of the carried entity, returning it
    pub fn detach(&mut self) -> Option<DragTarget> {
        self.target.take()
    }
}
