//! Particle seeding for the stages that carry a pool.

use std::f32::consts::TAU;

use hecs::World;
use rand::Rng;

use crate::canvas::Color;
use crate::components::{Appearance, Lifetime, Orbit, Position, Ray, Surface, Vec2, Velocity};

pub const NEBULA_CLOUD_COUNT: usize = 300;
pub const ACCRETION_PARTICLE_COUNT: usize = 500;
pub const CORONA_RAY_COUNT: usize = 20;
pub const EJECTA_PARTICLE_COUNT: usize = 300;

/// Distance at which infalling gas is recycled
pub const ACCRETION_MIN_DISTANCE: f32 = 10.0;
/// Distance recycled gas re-enters at
pub const ACCRETION_RESPAWN_DISTANCE: f32 = 400.0;
/// Distance from the center beyond which ejected gas is recycled
pub const EJECTA_MAX_DISTANCE: f32 = 300.0;

/// Spawn the drifting gas clouds of a stellar nursery
pub fn spawn_nebula_clouds(world: &mut World, surface: Surface, rng: &mut impl Rng) {
    for _ in 0..NEBULA_CLOUD_COUNT {
        let position = Vec2::new(rng.gen::<f32>() * surface.width, rng.gen::<f32>() * surface.height);
        let velocity = Vec2::new((rng.gen::<f32>() - 0.5) * 0.5, (rng.gen::<f32>() - 0.5) * 0.5);
        let size = rng.gen::<f32>() * 60.0 + 20.0;
        // Blue to violet, dim and mostly transparent
        let color = Color::hsla(rng.gen::<f32>() * 60.0 + 200.0, 0.7, 0.2, 0.1);

        world.spawn((Position(position), Velocity(velocity), Appearance::new(size, color)));
    }
}

/// Spawn the gas spiraling into a protostar.
///
/// Closer particles orbit faster.
pub fn spawn_accretion_disk(world: &mut World, surface: Surface, rng: &mut impl Rng) {
    let center = surface.center();
    for _ in 0..ACCRETION_PARTICLE_COUNT {
        let angle = rng.gen::<f32>() * TAU;
        let distance = rng.gen::<f32>() * 400.0 + 50.0;
        let orbit = Orbit {
            angle,
            distance,
            speed: accretion_speed(distance),
        };
        let size = rng.gen::<f32>() * 2.0 + 1.0;
        let color = Color::rgba8(255, (rng.gen::<f32>() * 100.0 + 100.0) as u8, 100, 0.8);

        world.spawn((orbit, Position(orbit.position(center)), Appearance::new(size, color)));
    }
}

/// Angular speed for an accreting particle at `distance`
pub fn accretion_speed(distance: f32) -> f32 {
    (500.0 - distance) * 0.0005 + 0.01
}

/// Spawn the corona rays of a main-sequence star
pub fn spawn_corona_rays(world: &mut World, rng: &mut impl Rng) {
    for _ in 0..CORONA_RAY_COUNT {
        world.spawn((Ray {
            angle: rng.gen::<f32>() * TAU,
            length: rng.gen::<f32>() * 20.0 + 50.0,
            speed: rng.gen::<f32>() * 0.02 + 0.01,
        },));
    }
}

/// Spawn the expanding shell of a planetary nebula, all at `center`
pub fn spawn_ejecta_shell(world: &mut World, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..EJECTA_PARTICLE_COUNT {
        let angle = rng.gen::<f32>() * TAU;
        let speed = rng.gen::<f32>() * 2.0 + 1.0;
        let size = rng.gen::<f32>() * 3.0;
        // Cyan to blue
        let color = Color::hsla(rng.gen::<f32>() * 60.0 + 180.0, 0.8, 0.6, 0.6);

        world.spawn((
            Position(center),
            Velocity(Vec2::from_polar(angle, speed)),
            Appearance::new(size, color),
            Lifetime::new(ejecta_lifetime(rng)),
        ));
    }
}

/// Fresh lifetime in ticks for an ejected particle
pub fn ejecta_lifetime(rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>() * 100.0 + 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn surface() -> Surface {
        Surface::new(800.0, 600.0)
    }

    #[test]
    fn test_nebula_clouds_within_ranges() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        spawn_nebula_clouds(&mut world, surface(), &mut rng);

        assert_eq!(world.len() as usize, NEBULA_CLOUD_COUNT);
        for (_, (pos, vel, look)) in world.query::<(&Position, &Velocity, &Appearance)>().iter() {
            assert!(surface().bounds().contains(&pos.0));
            assert!(vel.0.x.abs() <= 0.25 && vel.0.y.abs() <= 0.25);
            assert!(look.size >= 20.0 && look.size < 80.0);
            assert_eq!(look.color.a, 0.1);
        }
    }

    #[test]
    fn test_accretion_disk_speeds() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        spawn_accretion_disk(&mut world, surface(), &mut rng);

        assert_eq!(world.len() as usize, ACCRETION_PARTICLE_COUNT);
        for (_, orbit) in world.query::<&Orbit>().iter() {
            assert!(orbit.distance >= 50.0 && orbit.distance < 450.0);
            assert!(orbit.angle >= 0.0 && orbit.angle < TAU);
        }
        assert!(accretion_speed(60.0) > accretion_speed(400.0));
    }

    #[test]
    fn test_corona_rays() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        spawn_corona_rays(&mut world, &mut rng);

        assert_eq!(world.len() as usize, CORONA_RAY_COUNT);
        for (_, ray) in world.query::<&Ray>().iter() {
            assert!(ray.length >= 50.0 && ray.length < 70.0);
            assert!(ray.speed >= 0.01 && ray.speed < 0.03);
        }
    }

    #[test]
    fn test_ejecta_start_at_center() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(7);
        let center = surface().center();
        spawn_ejecta_shell(&mut world, center, &mut rng);

        assert_eq!(world.len() as usize, EJECTA_PARTICLE_COUNT);
        for (_, (pos, vel, life)) in world.query::<(&Position, &Velocity, &Lifetime)>().iter() {
            assert_eq!(pos.0, center);
            let speed = vel.0.length();
            assert!(speed >= 0.999 && speed <= 3.001);
            assert!(life.remaining >= 100.0 && life.remaining < 200.0);
        }
    }

    #[test]
    fn test_zero_area_seeding_does_not_panic() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        spawn_nebula_clouds(&mut world, Surface::new(0.0, 0.0), &mut rng);
        spawn_accretion_disk(&mut world, Surface::new(0.0, 0.0), &mut rng);
        assert_eq!(world.len() as usize, NEBULA_CLOUD_COUNT + ACCRETION_PARTICLE_COUNT);
    }
}
