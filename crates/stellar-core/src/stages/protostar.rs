//! Protostar - gas spiraling into a warming core

use crate::canvas::{Canvas, Color, Paint, RadialGradient};
use crate::components::{Appearance, Position};
use crate::generation::spawn_accretion_disk;
use crate::systems::spiral_infall_system;

use super::{Stage, StageContext, StageId};

/// Radius of the glow marking the forming core
pub const CORE_GLOW_RADIUS: f32 = 60.0;

pub struct Protostar;

impl Stage for Protostar {
    fn id(&self) -> StageId {
        StageId::Protostar
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
        spawn_accretion_disk(&mut ctx.world, ctx.surface, &mut ctx.rng);
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }
        let center = ctx.surface.center();

        spiral_infall_system(&mut ctx.world, center, &mut ctx.rng);

        for (_, (pos, look)) in ctx.world.query::<(&Position, &Appearance)>().iter() {
            canvas.fill_circle(pos.0, look.size, &Paint::Solid(look.color));
        }

        let glow = RadialGradient::new(center, 0.0, CORE_GLOW_RADIUS)
            .stop(0.0, Color::rgba8(255, 100, 50, 0.8))
            .stop(1.0, Color::TRANSPARENT);
        canvas.fill_circle(center, CORE_GLOW_RADIUS, &Paint::Radial(glow));
    }
}
