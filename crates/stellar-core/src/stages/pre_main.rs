//! Pre-main-sequence - a contracting, gently pulsating young star

use crate::canvas::{Canvas, Color, Paint, RadialGradient};

use super::{Stage, StageContext, StageId};

pub const PHASE_STEP: f64 = 0.05;
pub const BASE_RADIUS: f32 = 40.0;
pub const PULSE_AMPLITUDE: f32 = 2.0;
/// Outer glow reach as a multiple of the body radius
pub const GLOW_SCALE: f32 = 4.0;

pub struct PreMainSequence;

impl PreMainSequence {
    /// Body radius for a given phase
    pub fn radius(phase: f32) -> f32 {
        BASE_RADIUS + phase.sin() * PULSE_AMPLITUDE
    }
}

impl Stage for PreMainSequence {
    fn id(&self) -> StageId {
        StageId::PreMainSequence
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
        let radius = Self::radius(phase);

        let glow = RadialGradient::new(center, radius, radius * GLOW_SCALE)
            .stop(0.0, Color::rgba8(255, 150, 50, 0.4))
            .stop(1.0, Color::TRANSPARENT);
        canvas.fill_circle(center, radius * GLOW_SCALE, &Paint::Radial(glow));

        let body = RadialGradient::new(center, 0.0, radius)
            .stop(0.0, Color::rgb8(0xff, 0xcc, 0x00))
            .stop(0.6, Color::rgb8(0xff, 0x88, 0x00))
            .stop(1.0, Color::rgb8(0xcc, 0x44, 0x00));
        canvas.fill_circle(center, radius, &Paint::Radial(body));
    }
}
