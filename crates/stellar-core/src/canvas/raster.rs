//! Software rasterizer backing the viewer's frame texture.
//!
//! Pixels are stored premultiplied in `f32` so additive blending and
//! translucent gradients accumulate without banding. Shapes are evaluated
//! per pixel center in user space (the inverse of the current transform),
//! with a one-unit anti-aliased edge.

use super::{BlendMode, Canvas, DrawState, Paint, StateStack, Stroke, Transform};
use crate::components::{Rect, Vec2};

/// Device-space bounding box `(min_x, min_y, max_x, max_y)`
type Bounds = (f32, f32, f32, f32);

/// RGBA pixel buffer implementing [`Canvas`]
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
    stack: StateStack,
    device_scale: f32,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width * height],
            stack: StateStack::default(),
            device_scale: 1.0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate for a new surface size. Contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width * height];
        self.stack.reset();
    }

    /// Reset the drawing state. Call once per frame so a stage that forgets
    /// to restore cannot leak state into the next frame.
    pub fn begin_frame(&mut self) {
        self.stack.reset();
        self.stack.current.transform = Transform::scaling(self.device_scale);
    }

    /// Pixels per user-space unit, applied at the start of every frame.
    /// Lets a surface be rendered at a fraction of its logical size.
    pub fn set_device_scale(&mut self, scale: f32) {
        self.device_scale = scale;
    }

    pub fn device_scale(&self) -> f32 {
        self.device_scale
    }

    /// Straight-alpha RGBA8 value of one pixel
    pub fn pixel_rgba8(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpremultiply(self.pixels[y * self.width + x]))
    }

    /// Write the frame as straight-alpha RGBA8 into `out`.
    ///
    /// Writes at most `out.len() / 4` pixels, row-major from the top-left.
    pub fn write_rgba8(&self, out: &mut [u8]) {
        for (dst, src) in out.chunks_exact_mut(4).zip(self.pixels.iter()) {
            dst.copy_from_slice(&unpremultiply(*src));
        }
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = vec![0; self.width * self.height * 4];
        self.write_rgba8(&mut out);
        out
    }

    fn device_bounds_of_circle(&self, center: Vec2, reach: f32) -> Bounds {
        let transform = self.stack.current.transform;
        let c = transform.apply(center);
        let r = reach * transform.scale() + 1.0;
        (c.x - r, c.y - r, c.x + r, c.y + r)
    }

    /// Visit every pixel in `bounds`, letting `shade` return a premultiplied
    /// color and a coverage for the pixel center mapped back to user space.
    fn rasterize<F>(&mut self, bounds: Bounds, mut shade: F)
    where
        F: FnMut(Vec2) -> Option<([f32; 4], f32)>,
    {
        let state = self.stack.current;
        let Some(inverse) = state.transform.inverse() else {
            return;
        };
        if state.alpha <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }

        let (min_x, min_y, max_x, max_y) = bounds;
        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let device = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some((color, coverage)) = shade(inverse.apply(device)) else {
                    continue;
                };
                if coverage <= 0.0 {
                    continue;
                }
                let idx = y * self.width + x;
                self.pixels[idx] = composite(self.pixels[idx], color, coverage * state.alpha, state.blend);
            }
        }
    }

    fn draw_shadow(&mut self, state: &DrawState, center: Vec2, radius: f32) {
        let Some(shadow) = state.shadow else {
            return;
        };
        if shadow.blur <= 0.0 || shadow.color.a <= 0.0 {
            return;
        }
        let color = shadow.color.premultiplied();
        let bounds = self.device_bounds_of_circle(center, radius + shadow.blur);
        self.rasterize(bounds, |p| {
            let d = p.distance(&center);
            if d > radius + shadow.blur {
                return None;
            }
            let falloff = if d <= radius {
                1.0
            } else {
                1.0 - (d - radius) / shadow.blur
            };
            Some((color, falloff * falloff))
        });
    }
}

impl Canvas for PixelCanvas {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let transform = self.stack.current.transform;
        let corners = [
            transform.apply(rect.min),
            transform.apply(Vec2::new(rect.max.x, rect.min.y)),
            transform.apply(rect.max),
            transform.apply(Vec2::new(rect.min.x, rect.max.y)),
        ];
        let bounds = corners.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), c| (x0.min(c.x), y0.min(c.y), x1.max(c.x), y1.max(c.y)),
        );

        self.rasterize(bounds, |p| {
            let inside = p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y;
            inside.then(|| (paint.sample(p), 1.0))
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let state = self.stack.current;
        self.draw_shadow(&state, center, radius);

        let bounds = self.device_bounds_of_circle(center, radius);
        self.rasterize(bounds, |p| {
            let coverage = (radius - p.distance(&center) + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then(|| (paint.sample(p), coverage))
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        let half = stroke.width / 2.0;
        let color = stroke.color.premultiplied();
        let bounds = self.device_bounds_of_circle(center, radius + half);
        self.rasterize(bounds, |p| {
            let offset = (p.distance(&center) - radius).abs();
            let coverage = (half - offset + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then_some((color, coverage))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let half = stroke.width / 2.0;
        let color = stroke.color.premultiplied();
        let transform = self.stack.current.transform;
        let (a, b) = (transform.apply(from), transform.apply(to));
        let pad = half * transform.scale() + 1.0;
        let bounds = (
            a.x.min(b.x) - pad,
            a.y.min(b.y) - pad,
            a.x.max(b.x) + pad,
            a.y.max(b.y) + pad,
        );

        self.rasterize(bounds, |p| {
            let coverage = (half - distance_to_segment(p, from, to) + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then_some((color, coverage))
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

fn composite(dst: [f32; 4], src: [f32; 4], alpha: f32, blend: BlendMode) -> [f32; 4] {
    let s = [src[0] * alpha, src[1] * alpha, src[2] * alpha, src[3] * alpha];
    match blend {
        BlendMode::Normal => {
            let keep = 1.0 - s[3];
            [
                s[0] + dst[0] * keep,
                s[1] + dst[1] * keep,
                s[2] + dst[2] * keep,
                s[3] + dst[3] * keep,
            ]
        }
        BlendMode::Lighter => [
            (s[0] + dst[0]).min(1.0),
            (s[1] + dst[1]).min(1.0),
            (s[2] + dst[2]).min(1.0),
            (s[3] + dst[3]).min(1.0),
        ],
    }
}

fn unpremultiply(p: [f32; 4]) -> [u8; 4] {
    let a = p[3].clamp(0.0, 1.0);
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [to_u8(p[0] / a), to_u8(p[1] / a), to_u8(p[2] / a), to_u8(a)]
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f32::EPSILON {
        return p.distance(&a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(&(a + ab * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, RadialGradient, Shadow};

    #[test]
    fn test_fill_rect_background() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.fill_rect(Rect::from_size(8.0, 8.0), &Paint::Solid(Color::rgb8(5, 5, 16)));
        assert_eq!(canvas.pixel_rgba8(3, 3), Some([5, 5, 16, 255]));
        assert_eq!(canvas.pixel_rgba8(8, 0), None);
    }

    #[test]
    fn test_fill_circle_coverage() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 4.0, &Paint::Solid(Color::WHITE));
        assert_eq!(canvas.pixel_rgba8(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel_rgba8(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_device_scale_shrinks_user_space() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.set_device_scale(0.5);
        canvas.begin_frame();
        canvas.fill_rect(Rect::from_size(20.0, 20.0), &Paint::Solid(Color::WHITE));
        assert_eq!(canvas.pixel_rgba8(9, 9), Some([255, 255, 255, 255]));

        canvas.begin_frame();
        canvas.fill_circle(Vec2::new(10.0, 10.0), 4.0, &Paint::Solid(Color::BLACK));
        assert_eq!(canvas.pixel_rgba8(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel_rgba8(8, 8), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_global_alpha_applies() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), &Paint::Solid(Color::WHITE));
        let [_, _, _, a] = canvas.pixel_rgba8(1, 1).unwrap_or_default();
        assert_eq!(a, 128);
    }

    #[test]
    fn test_lighter_blend_accumulates() {
        let mut canvas = PixelCanvas::new(4, 4);
        let paint = Paint::Solid(Color::rgba8(100, 0, 0, 1.0));
        canvas.set_blend_mode(BlendMode::Lighter);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), &paint);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), &paint);
        assert_eq!(canvas.pixel_rgba8(0, 0), Some([200, 0, 0, 255]));
    }

    #[test]
    fn test_normal_blend_replaces_opaque() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), &Paint::Solid(Color::WHITE));
        canvas.fill_rect(Rect::from_size(4.0, 4.0), &Paint::Solid(Color::BLACK));
        assert_eq!(canvas.pixel_rgba8(2, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_gradient_fill_fades() {
        let mut canvas = PixelCanvas::new(41, 41);
        let gradient = RadialGradient::new(Vec2::new(20.5, 20.5), 0.0, 20.0)
            .stop(0.0, Color::WHITE)
            .stop(1.0, Color::TRANSPARENT);
        canvas.fill_circle(Vec2::new(20.5, 20.5), 20.0, &Paint::Radial(gradient));
        let center = canvas.pixel_rgba8(20, 20).unwrap_or_default();
        let edge = canvas.pixel_rgba8(20, 38).unwrap_or_default();
        assert!(center[3] > 240);
        assert!(edge[3] < 40);
    }

    #[test]
    fn test_rotated_line() {
        let mut canvas = PixelCanvas::new(40, 40);
        canvas.save();
        canvas.translate(20.0, 20.0);
        canvas.rotate(std::f32::consts::FRAC_PI_2);
        // (0, 0) -> (0, 15) becomes a horizontal line to the left of center
        canvas.stroke_line(Vec2::ZERO, Vec2::new(0.0, 15.0), &Stroke::new(Color::WHITE, 2.0));
        canvas.restore();
        assert_eq!(canvas.pixel_rgba8(10, 20).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel_rgba8(30, 20).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_shadow_glows_beyond_shape() {
        let mut canvas = PixelCanvas::new(60, 60);
        canvas.set_shadow(Some(Shadow::new(Color::WHITE, 20.0)));
        canvas.fill_circle(Vec2::new(30.0, 30.0), 5.0, &Paint::Solid(Color::WHITE));
        let glow = canvas.pixel_rgba8(30, 42).unwrap_or_default();
        assert!(glow[3] > 0);
    }

    #[test]
    fn test_stroke_circle_ring() {
        let mut canvas = PixelCanvas::new(40, 40);
        canvas.stroke_circle(Vec2::new(20.0, 20.0), 10.0, &Stroke::new(Color::WHITE, 2.0));
        assert_eq!(canvas.pixel_rgba8(20, 20).map(|p| p[3]), Some(0));
        assert!(canvas.pixel_rgba8(29, 20).map(|p| p[3]).unwrap_or(0) > 0);
    }

    #[test]
    fn test_write_rgba8_and_resize() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.fill_rect(Rect::from_size(2.0, 2.0), &Paint::Solid(Color::WHITE));
        assert_eq!(canvas.to_rgba8(), vec![255; 16]);

        canvas.resize(3, 1);
        assert_eq!(canvas.to_rgba8().len(), 12);
        assert_eq!(canvas.width(), 3);
    }
}
