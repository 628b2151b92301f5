//! White dwarf - the small, dense, slowly cooling remnant

use crate::canvas::{Canvas, Color, Paint, RadialGradient, Shadow};

use super::{Stage, StageContext, StageId};

pub const RADIUS: f32 = 15.0;
pub const POINT_RADIUS: f32 = 4.0;
pub const POINT_GLOW: f32 = 15.0;

pub struct WhiteDwarf;

impl Stage for WhiteDwarf {
    fn id(&self) -> StageId {
        StageId::WhiteDwarf
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }
        let center = ctx.surface.center();

        let body = Paint::Radial(
            RadialGradient::new(center, 0.0, RADIUS)
                .stop(0.0, Color::rgb8(0xff, 0xff, 0xff))
                .stop(0.4, Color::rgb8(0xee, 0xee, 0xff))
                .stop(1.0, Color::rgba8(255, 255, 255, 0.0)),
        );
        canvas.fill_circle(center, RADIUS, &body);

        canvas.set_shadow(Some(Shadow::new(Color::rgba8(255, 255, 255, 0.8), POINT_GLOW)));
        canvas.fill_circle(center, POINT_RADIUS, &body);
        canvas.set_shadow(None);
    }
}
