//! Drift system - free-floating gas that wraps around a padded surface

use hecs::World;

use crate::components::{Position, Rect, Velocity};

/// Integrate positions by velocity and wrap anything leaving `bounds` to the
/// opposite edge
pub fn drift_system(world: &mut World, bounds: Rect) {
    for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.0 += vel.0;
        wrap(&mut pos.0.x, bounds.min.x, bounds.max.x);
        wrap(&mut pos.0.y, bounds.min.y, bounds.max.y);
    }
}

fn wrap(value: &mut f32, min: f32, max: f32) {
    if *value < min {
        *value = max;
    }
    if *value > max {
        *value = min;
    }
}
