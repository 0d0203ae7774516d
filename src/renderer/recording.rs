//! In-memory surface that records draw calls

use glam::DVec2;

use super::surface::{LinearGradient, Rect, Surface};
use crate::color::Rgba;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    Fill { rect: Rect, color: Rgba },
    Gradient { rect: Rect, gradient: LinearGradient },
}

/// Surface that keeps every call since the last `take_commands`
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: DVec2,
    size: (u32, u32),
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: DVec2::new(width, height),
            size: (0, 0),
            commands: Vec::new(),
        }
    }

    /// Pretend the window was resized
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = DVec2::new(width, height);
    }

    /// Backing store size from the last `resize`
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Solid fills recorded so far
    pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    /// Gradient fills recorded so far
    pub fn gradients(&self) -> impl Iterator<Item = (&Rect, &LinearGradient)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Gradient { rect, gradient } => Some((rect, gradient)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> DVec2 {
        self.viewport
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &LinearGradient) {
        self.commands.push(DrawCommand::Gradient {
            rect,
            gradient: *gradient,
        });
    }
}
