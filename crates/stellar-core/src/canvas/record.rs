//! Recording canvas - captures draw calls instead of producing pixels.

use super::{Canvas, DrawState, Paint, StateStack, Stroke};
use crate::components::{Rect, Vec2};

/// One recorded draw call.
///
/// Circle and line geometry is stored in device space (after the transform);
/// `state` is the drawing state at the time of the call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        paint: Paint,
        state: DrawState,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
        state: DrawState,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        stroke: Stroke,
        state: DrawState,
    },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
        state: DrawState,
    },
}

impl DrawCommand {
    pub fn state(&self) -> &DrawState {
        match self {
            DrawCommand::FillRect { state, .. }
            | DrawCommand::FillCircle { state, .. }
            | DrawCommand::StrokeCircle { state, .. }
            | DrawCommand::StrokeLine { state, .. } => state,
        }
    }
}

/// Canvas that keeps every draw call for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    stack: StateStack,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands, keeping the drawing state
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Open save() calls not yet matched by restore()
    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn filled_circles(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillCircle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }

    pub fn stroked_lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::StrokeLine { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
            state: self.stack.current,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let state = self.stack.current;
        self.commands.push(DrawCommand::FillCircle {
            center: state.transform.apply(center),
            radius: radius * state.transform.scale(),
            paint: paint.clone(),
            state,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        let state = self.stack.current;
        self.commands.push(DrawCommand::StrokeCircle {
            center: state.transform.apply(center),
            radius: radius * state.transform.scale(),
            stroke: *stroke,
            state,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let state = self.stack.current;
        self.commands.push(DrawCommand::StrokeLine {
            from: state.transform.apply(from),
            to: state.transform.apply(to),
            stroke: *stroke,
            state,
        });
    }

    fn state(&self) -> &DrawState {
        &self.stack.current
    }

    fn state_mut(&mut self) -> &mut DrawState {
        &mut self.stack.current
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }
}
