//! Nebula - a cold, drifting cloud of gas and dust

use crate::canvas::{BlendMode, Canvas, Color, Paint, RadialGradient};
use crate::components::{Appearance, Position};
use crate::generation::spawn_nebula_clouds;
use crate::systems::drift_system;

use super::{Stage, StageContext, StageId};

/// Margin beyond the surface edge before a cloud wraps around
pub const WRAP_PADDING: f32 = 100.0;
/// Radius of the additive density glow at the center
pub const CLUMP_GLOW_RADIUS: f32 = 300.0;

pub struct Nebula;

impl Stage for Nebula {
    fn id(&self) -> StageId {
        StageId::Nebula
    }

    fn init(&self, ctx: &mut StageContext) {
        ctx.world.clear();
        spawn_nebula_clouds(&mut ctx.world, ctx.surface, &mut ctx.rng);
    }

    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas) {
        if !ctx.surface.is_drawable() {
            return;
        }

        drift_system(&mut ctx.world, ctx.surface.bounds().padded(WRAP_PADDING));

        for (_, (pos, look)) in ctx.world.query::<(&Position, &Appearance)>().iter() {
            let cloud = RadialGradient::new(pos.0, 0.0, look.size)
                .stop(0.0, look.color)
                .stop(1.0, Color::TRANSPARENT);
            canvas.fill_circle(pos.0, look.size, &Paint::Radial(cloud));
        }

        // Hint of clumping where the star will form
        let glow = RadialGradient::new(ctx.surface.center(), 0.0, CLUMP_GLOW_RADIUS)
            .stop(0.0, Color::rgba8(100, 100, 255, 0.1))
            .stop(1.0, Color::TRANSPARENT);
        canvas.set_blend_mode(BlendMode::Lighter);
        canvas.fill_rect(ctx.surface.bounds(), &Paint::Radial(glow));
        canvas.set_blend_mode(BlendMode::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::components::{Surface, Velocity};

    #[test]
    fn test_render_draws_clouds_then_additive_glow() {
        let mut ctx = StageContext::seeded(Surface::new(800.0, 600.0), 5);
        let mut canvas = RecordingCanvas::new();
        Nebula.init(&mut ctx);
        Nebula.render(&mut ctx, &mut canvas);

        let commands = canvas.commands();
        assert_eq!(commands.len(), 301);
        assert!(commands[..300]
            .iter()
            .all(|c| matches!(c, DrawCommand::FillCircle { .. }) && c.state().blend == BlendMode::Normal));
        match &commands[300] {
            DrawCommand::FillRect { state, .. } => assert_eq!(state.blend, BlendMode::Lighter),
            other => panic!("expected glow fill, got {other:?}"),
        }
        assert_eq!(canvas.blend_mode(), BlendMode::Normal);
    }

    #[test]
    fn test_clouds_stay_within_padded_bounds() {
        let surface = Surface::new(320.0, 240.0);
        let mut ctx = StageContext::seeded(surface, 9);
        let mut canvas = RecordingCanvas::new();
        Nebula.init(&mut ctx);

        // Fast clouds so plenty of them wrap
        for (_, vel) in ctx.world.query_mut::<&mut Velocity>() {
            vel.0 = vel.0 * 40.0;
        }
        let bounds = surface.bounds().padded(WRAP_PADDING);
        for _ in 0..100 {
            Nebula.render(&mut ctx, &mut canvas);
            canvas.clear();
            for (_, pos) in ctx.world.query::<&Position>().iter() {
                assert!(bounds.contains(&pos.0));
            }
        }
    }
}
