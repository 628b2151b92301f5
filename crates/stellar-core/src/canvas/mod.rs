//! Canvas capability - the immediate-mode 2D surface stages draw into.
//!
//! The core never owns pixels. Stages talk to a [`Canvas`] trait object that
//! offers filled and stroked primitives, radial gradients, global alpha,
//! blend modes, shadows and a save/restore transform stack. Two
//! implementations ship with the crate:
//!
//! - [`RecordingCanvas`] records draw commands (tests, headless harness)
//! - [`PixelCanvas`] rasterizes into an RGBA buffer (viewer)

mod color;
mod raster;
mod record;

pub use color::*;
pub use raster::PixelCanvas;
pub use record::{DrawCommand, RecordingCanvas};

use serde::{Deserialize, Serialize};

use crate::components::{Rect, Vec2};

/// How source pixels combine with what is already drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// Source-over compositing
    #[default]
    Normal,
    /// Additive compositing (CSS `lighter`)
    Lighter,
}

/// Glow drawn around filled shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    /// Blur radius in surface units
    pub blur: f32,
}

impl Shadow {
    pub fn new(color: Color, blur: f32) -> Self {
        Self { color, blur }
    }
}

/// One stop of a gradient, `offset` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Concentric radial gradient between `inner_radius` and `outer_radius`.
///
/// Points inside the inner radius take the first stop, points beyond the
/// outer radius take the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            stops: Vec::new(),
        }
    }

    /// Append a stop. Stops must be added in ascending offset order.
    pub fn stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
        self
    }

    /// Premultiplied color at `distance` from the center
    pub fn sample(&self, distance: f32) -> [f32; 4] {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [0.0; 4],
        };

        let span = self.outer_radius - self.inner_radius;
        let t = if span > 0.0 {
            ((distance - self.inner_radius) / span).clamp(0.0, 1.0)
        } else if distance < self.inner_radius {
            0.0
        } else {
            1.0
        };

        if t <= first.offset {
            return first.color.premultiplied();
        }
        if t >= last.offset {
            return last.color.premultiplied();
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t >= lo.offset && t <= hi.offset {
                let width = hi.offset - lo.offset;
                let local = if width > 0.0 { (t - lo.offset) / width } else { 1.0 };
                return lerp_premultiplied(lo.color.premultiplied(), hi.color.premultiplied(), local);
            }
        }

        last.color.premultiplied()
    }
}

/// Fill style for shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl Paint {
    /// Premultiplied color at a point in user space
    pub fn sample(&self, point: Vec2) -> [f32; 4] {
        match self {
            Paint::Solid(color) => color.premultiplied(),
            Paint::Radial(gradient) => gradient.sample(point.distance(&gradient.center)),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<RadialGradient> for Paint {
    fn from(gradient: RadialGradient) -> Self {
        Paint::Radial(gradient)
    }
}

/// Stroke style for outlines and lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// 2D affine transform mapping `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Uniform scale about the origin
    pub fn scaling(factor: f32) -> Self {
        Self {
            a: factor,
            d: factor,
            ..Self::IDENTITY
        }
    }

    /// `self` followed by a translation in the current user space
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            e: self.a * dx + self.c * dy + self.e,
            f: self.b * dx + self.d * dy + self.f,
            ..*self
        }
    }

    /// `self` followed by a clockwise rotation (y down) in the current user space
    pub fn rotated(&self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            e: self.e,
            f: self.f,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Inverse transform, `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Uniform scale factor (1.0 for rotations and translations)
    pub fn scale(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawing state saved and restored as a unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub alpha: f32,
    pub blend: BlendMode,
    pub shadow: Option<Shadow>,
    pub transform: Transform,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blend: BlendMode::Normal,
            shadow: None,
            transform: Transform::IDENTITY,
        }
    }
}

/// Immediate-mode 2D drawing surface.
///
/// Coordinates are in user space and pass through the current transform.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);

    fn state(&self) -> &DrawState;
    fn state_mut(&mut self) -> &mut DrawState;
    fn save(&mut self);
    fn restore(&mut self);

    fn global_alpha(&self) -> f32 {
        self.state().alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state_mut().alpha = alpha.clamp(0.0, 1.0);
    }

    fn blend_mode(&self) -> BlendMode {
        self.state().blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state_mut().blend = mode;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state_mut().shadow = shadow;
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let state = self.state_mut();
        state.transform = state.transform.translated(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        let state = self.state_mut();
        state.transform = state.transform.rotated(radians);
    }
}

/// Save/restore stack shared by the canvas implementations
#[derive(Debug, Clone, Default)]
pub(crate) struct StateStack {
    pub current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores are ignored
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn reset(&mut self) {
        self.current = DrawState::default();
        self.saved.clear();
    }
}
