//! Red giant - a swollen, cooling star with a restless surface

use rand::Rng;

use crate::canvas::{Canvas, Color, Paint, RadialGradient, Stroke};

use super::{Stage, StageContext, StageId};

pub const PHASE_STEP: f64 = 0.01;
pub const BASE_RADIUS: f32 = 150.0;
pub const PULSE_AMPLITUDE: f32 = 5.0;
/// Maximum outward jitter of the instability outline
pub const TURBULENCE: f32 = 10.0;

pub struct RedGiant;

impl Stage for RedGiant {
    fn id(&self) -> StageId {
        StageId::RedGiant
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
        ctx.phase.reset();
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }
        let center = ctx.surface.center();
        let phase = ctx.phase.advance(PHASE_STEP) as f32;
        let radius = BASE_RADIUS + phase.sin() * PULSE_AMPLITUDE;

        let body = RadialGradient::new(center, radius * 0.5, radius)
            .stop(0.0, Color::rgb8(0xff, 0x44, 0x00))
            .stop(0.8, Color::rgb8(0xcc, 0x22, 0x00))
            .stop(1.0, Color::rgba8(100, 0, 0, 0.5));
        canvas.fill_circle(center, radius, &Paint::Radial(body));

        let jitter = ctx.rng.gen::<f32>() * TURBULENCE;
        canvas.stroke_circle(center, radius + jitter, &Stroke::new(Color::rgba8(255, 50, 0, 0.2), 2.0));
    }
}
