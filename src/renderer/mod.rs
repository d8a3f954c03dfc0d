//! Render-facing types
//!
//! Compositing is the host's job; this module only describes what to draw.

pub mod draw_list;

pub use draw_list::{DrawCommand, DrawOp, Frame, Layer};
