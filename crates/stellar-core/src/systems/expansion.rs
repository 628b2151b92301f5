//! Expansion system - gas blown outward from a dying star

use hecs::World;
use rand::Rng;

use crate::components::{Lifetime, Position, Vec2, Velocity};
use crate::generation::{ejecta_lifetime, EJECTA_MAX_DISTANCE};

/// Move ejected gas outward, age it, and recycle anything that has escaped
/// too far or burned out back to `center` with a fresh lifetime.
///
/// Particles are never despawned; the pool size stays fixed.
pub fn expansion_system(world: &mut World, center: Vec2, rng: &mut impl Rng) {
    for (_, (pos, vel, life)) in world.query_mut::<(&mut Position, &Velocity, &mut Lifetime)>() {
        pos.0 += vel.0;
        life.remaining -= 1.0;

        if pos.0.distance(&center) > EJECTA_MAX_DISTANCE || life.expired() {
            pos.0 = center;
            life.remaining = ejecta_lifetime(rng);
        }
    }
}
