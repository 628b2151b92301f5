//! Planetary nebula - outer layers blown away from an exposed core

use crate::canvas::{Canvas, Color, Paint, Shadow};
use crate::components::{Appearance, Position};
use crate::generation::spawn_ejecta_shell;
use crate::systems::expansion_system;

use super::{Stage, StageContext, StageId};

pub const CORE_RADIUS: f32 = 5.0;
pub const CORE_GLOW: f32 = 20.0;

pub struct PlanetaryNebula;

impl Stage for PlanetaryNebula {
    fn id(&self) -> StageId {
        StageId::PlanetaryNebula
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
        spawn_ejecta_shell(&mut ctx.world, ctx.surface.center(), &mut ctx.rng);
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }
        let center = ctx.surface.center();

        expansion_system(&mut ctx.world, center, &mut ctx.rng);

        for (_, (pos, look)) in ctx.world.query::<(&Position, &Appearance)>().iter() {
            canvas.fill_circle(pos.0, look.size, &Paint::Solid(look.color));
        }

        // The white dwarf remnant showing through
        canvas.set_shadow(Some(Shadow::new(Color::WHITE, CORE_GLOW)));
        canvas.fill_circle(center, CORE_RADIUS, &Paint::Solid(Color::WHITE));
        canvas.set_shadow(None);
    }
}
