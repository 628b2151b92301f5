//! Spiral system - gas falling inward around the surface center

use std::f32::consts::TAU;

use hecs::World;
use rand::Rng;

use crate::components::{Orbit, Position, Vec2};
use crate::generation::{ACCRETION_MIN_DISTANCE, ACCRETION_RESPAWN_DISTANCE};

/// Inward distance covered per tick
pub const INFALL_STEP: f32 = 0.5;

/// Advance every orbit one tick and refresh the cached Cartesian position.
///
/// Particles that fall below the minimum distance re-enter at the respawn
/// distance with a new angle, so the inflow never runs dry.
pub fn spiral_infall_system(world: &mut World, center: Vec2, rng: &mut impl Rng) {
    for (_, (orbit, pos)) in world.query_mut::<(&mut Orbit, &mut Position)>() {
        orbit.angle = (orbit.angle + orbit.speed) % TAU;
        orbit.distance -= INFALL_STEP;

        if orbit.distance < ACCRETION_MIN_DISTANCE {
            orbit.distance = ACCRETION_RESPAWN_DISTANCE;
            orbit.angle = rng.gen::<f32>() * TAU;
        }

        pos.0 = orbit.position(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_infall_moves_inward_and_rotates() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let orbit = Orbit {
            angle: 0.0,
            distance: 100.0,
            speed: 0.1,
        };
        let e = world.spawn((orbit, Position(Vec2::ZERO)));

        spiral_infall_system(&mut world, Vec2::new(50.0, 50.0), &mut rng);

        let orbit = world.get::<&Orbit>(e).map(|o| *o).unwrap_or(orbit);
        assert_eq!(orbit.distance, 99.5);
        assert!((orbit.angle - 0.1).abs() < 1e-6);
        let pos = world.get::<&Position>(e).map(|p| p.0).unwrap_or_default();
        assert!((pos.distance(&Vec2::new(50.0, 50.0)) - 99.5).abs() < 1e-3);
    }

    #[test]
    fn test_infall_recycles_at_core() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let e = world.spawn((
            Orbit {
                angle: 1.0,
                distance: 10.2,
                speed: 0.2,
            },
            Position(Vec2::ZERO),
        ));

        spiral_infall_system(&mut world, Vec2::ZERO, &mut rng);

        let distance = world.get::<&Orbit>(e).map(|o| o.distance).unwrap_or(0.0);
        assert_eq!(distance, ACCRETION_RESPAWN_DISTANCE);
    }
}
