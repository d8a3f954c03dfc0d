//! Windowless host
//!
//! Paces the loop to the target rate, feeds empty input and discards frames.
//! Useful for soak runs and for exercising the asset watcher without a GPU.

use std::thread;
use std::time::{Duration, Instant};

use super::Host;
use crate::error::AquariumError;
use crate::renderer::{Frame, Layer};
use crate::settings::Settings;
use crate::sim::{FrameInput, Viewport};

const FPS_WINDOW: usize = 60;

pub struct HeadlessHost {
    viewport: Viewport,
    frame_duration: Duration,
    max_frames: Option<u64>,
    log_fps: bool,
    frames: u64,
    next_deadline: Option<Instant>,
    // FPS tracking
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    last_fps_log: Option<Instant>,
}

impl HeadlessHost {
    pub fn new(settings: &Settings) -> Self {
        Self {
            viewport: settings.viewport,
            frame_duration: settings.frame_duration(),
            max_frames: settings.max_frames,
            log_fps: settings.log_fps,
            frames: 0,
            next_deadline: None,
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            last_fps_log: None,
        }
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average rate over the last `FPS_WINDOW` presented frames
    pub fn fps(&self) -> Option<f64> {
        let newest = self.frame_times[(self.frame_index + FPS_WINDOW - 1) % FPS_WINDOW]?;
        let oldest = self.frame_times[self.frame_index].or(self.frame_times[0])?;
        let samples = if self.frame_times[self.frame_index].is_some() {
            FPS_WINDOW
        } else {
            self.frame_index
        };
        let elapsed = newest.duration_since(oldest).as_secs_f64();
        if samples < 2 || elapsed <= 0.0 {
            return None;
        }
        Some((samples - 1) as f64 / elapsed)
    }

    fn pace(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        // A late frame pushes the schedule back
        self.next_deadline = Some(deadline.max(now) + self.frame_duration);
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn next_frame(&mut self) -> Result<Option<FrameInput>, AquariumError> {
        if self.max_frames.is_some_and(|max| self.frames >= max) {
            return Ok(None);
        }
        self.pace();
        Ok(Some(FrameInput::default()))
    }

    fn present(&mut self, frame: &Frame) -> Result<(), AquariumError> {
        let now = Instant::now();
        self.frames += 1;
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        if !self.log_fps {
            return Ok(());
        }
        let due = self
            .last_fps_log
            .is_none_or(|last| now.duration_since(last) >= Duration::from_secs(1));
        if due {
            self.last_fps_log = Some(now);
            if let Some(fps) = self.fps() {
                log::info!(
                    "frame {} fps {:.1} (sprites {}, bubbles {}, fish {})",
                    frame.index,
                    fps,
                    frame.count(Layer::Sprite) + frame.count(Layer::DraggedSprite),
                    frame.count(Layer::Bubble),
                    frame.count(Layer::Fish)
                );
            }
        }
        Ok(())
    }
}
