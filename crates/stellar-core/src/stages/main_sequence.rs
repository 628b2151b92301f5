//! Main sequence - a stable star with a slowly turning corona

use rand::Rng;

use crate::canvas::{Canvas, Color, Paint, RadialGradient, Stroke};
use crate::components::{Ray, Vec2};
use crate::generation::spawn_corona_rays;

use super::{Stage, StageContext, StageId};

pub const PHASE_STEP: f64 = 0.02;
pub const BASE_RADIUS: f32 = 50.0;
/// Body gradient reaches this far past the base radius
pub const BODY_OVERHANG: f32 = 20.0;
/// Corona rotation per unit of phase
pub const CORONA_SPIN: f32 = 0.2;
pub const FLARE_AMPLITUDE: f32 = 10.0;
pub const RAY_WIDTH: f32 = 2.0;
/// Upper bound of the per-frame random ray opacity
pub const RAY_MAX_ALPHA: f32 = 0.3;

pub struct MainSequence;

impl MainSequence {
    /// Ray reach from the center for a given phase
    pub fn ray_reach(ray: &Ray, phase: f32) -> f32 {
        BASE_RADIUS + ray.length + (phase * 2.0).sin() * FLARE_AMPLITUDE
    }
}

impl Stage for MainSequence {
    fn id(&self) -> StageId {
        StageId::MainSequence
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
        ctx.phase.reset();
        spawn_corona_rays(&mut ctx.world, &mut ctx.rng);
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }
        let center = ctx.surface.center();
        let phase = ctx.phase.advance(PHASE_STEP) as f32;

        // Each ray turns the frame a little further, fanning them out
        canvas.save();
        canvas.translate(center.x, center.y);
        canvas.rotate(phase * CORONA_SPIN);
        for (_, ray) in ctx.world.query::<&Ray>().iter() {
            canvas.rotate(ray.speed);
            let alpha = ctx.rng.gen::<f32>() * RAY_MAX_ALPHA;
            canvas.stroke_line(
                Vec2::ZERO,
                Vec2::new(0.0, Self::ray_reach(ray, phase)),
                &Stroke::new(Color::rgba8(255, 255, 200, alpha), RAY_WIDTH),
            );
        }
        canvas.restore();

        let radius = BASE_RADIUS + BODY_OVERHANG;
        let body = RadialGradient::new(center, 0.0, radius)
            .stop(0.0, Color::rgb8(0xff, 0xff, 0xff))
            .stop(0.2, Color::rgb8(0xff, 0xfe, 0xbb))
            .stop(0.5, Color::rgb8(0xff, 0xcc, 0x00))
            .stop(1.0, Color::rgba8(255, 200, 0, 0.0));
        canvas.fill_circle(center, radius, &Paint::Radial(body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::components::Surface;

    #[test]
    fn test_phase_accumulates_linearly() {
        let mut ctx = StageContext::seeded(Surface::new(800.0, 600.0), 8);
        let mut canvas = RecordingCanvas::new();
        MainSequence.init(&mut ctx);

        for k in 1..=500u32 {
            MainSequence.render(&mut ctx, &mut canvas);
            canvas.clear();
            assert!((ctx.phase.value() - 0.02 * k as f64).abs() < 1e-9, "tick {k}");
        }
    }

    #[test]
    fn test_rays_fan_out_from_center() {
        let surface = Surface::new(800.0, 600.0);
        let mut ctx = StageContext::seeded(surface, 8);
        let mut canvas = RecordingCanvas::new();
        MainSequence.init(&mut ctx);
        MainSequence.render(&mut ctx, &mut canvas);

        let lines: Vec<_> = canvas.stroked_lines().collect();
        assert_eq!(lines.len(), 20);
        for (from, to) in &lines {
            assert!(from.distance(&surface.center()) < 1e-3);
            let reach = to.distance(from);
            // 50 + [50, 70) +/- 10
            assert!(reach >= 90.0 - 1e-3 && reach <= 130.0 + 1e-3);
        }
        for command in canvas.commands() {
            if let DrawCommand::StrokeLine { stroke, .. } = command {
                assert_eq!(stroke.width, RAY_WIDTH);
                assert!(stroke.color.a >= 0.0 && stroke.color.a < RAY_MAX_ALPHA);
            }
        }
        let (_, body) = canvas.filled_circles().last().unwrap_or_default();
        assert_eq!(body, 70.0);
    }
}
