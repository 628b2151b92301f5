//! Stage models - one procedural simulation per step of the stellar life cycle.
//!
//! Every stage implements [`Stage`]: `init` seeds the shared [`StageContext`]
//! and `render` advances it one tick and draws it. Stage values carry no
//! state of their own; everything mutable lives in the context, which only
//! ever holds the active stage's particles.

pub mod main_sequence;
pub mod nebula;
pub mod planetary_nebula;
pub mod pre_main;
pub mod protostar;
pub mod red_giant;
pub mod white_dwarf;

pub use main_sequence::MainSequence;
pub use nebula::Nebula;
pub use planetary_nebula::PlanetaryNebula;
pub use pre_main::PreMainSequence;
pub use protostar::Protostar;
pub use red_giant::RedGiant;
pub use white_dwarf::WhiteDwarf;

use hecs::World;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::components::{Phase, Surface};

/// Symbolic stage identity, in life-cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    Nebula,
    Protostar,
    #[serde(rename = "pre-main")]
    PreMainSequence,
    MainSequence,
    RedGiant,
    PlanetaryNebula,
    WhiteDwarf,
}

impl StageId {
    /// All stages in life-cycle order
    pub const ALL: [StageId; 7] = [
        StageId::Nebula,
        StageId::Protostar,
        StageId::PreMainSequence,
        StageId::MainSequence,
        StageId::RedGiant,
        StageId::PlanetaryNebula,
        StageId::WhiteDwarf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Nebula => "nebula",
            StageId::Protostar => "protostar",
            StageId::PreMainSequence => "pre-main",
            StageId::MainSequence => "main-sequence",
            StageId::RedGiant => "red-giant",
            StageId::PlanetaryNebula => "planetary-nebula",
            StageId::WhiteDwarf => "white-dwarf",
        }
    }

    /// Position in the life cycle
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Particles the stage keeps alive between ticks
    pub fn pool_size(&self) -> usize {
        use crate::generation::*;
        match self {
            StageId::Nebula => NEBULA_CLOUD_COUNT,
            StageId::Protostar => ACCRETION_PARTICLE_COUNT,
            StageId::MainSequence => CORONA_RAY_COUNT,
            StageId::PlanetaryNebula => EJECTA_PARTICLE_COUNT,
            StageId::PreMainSequence | StageId::RedGiant | StageId::WhiteDwarf => 0,
        }
    }

    /// Stage model implementing this id
    pub fn model(&self) -> Box<dyn Stage> {
        match self {
            StageId::Nebula => Box::new(Nebula),
            StageId::Protostar => Box::new(Protostar),
            StageId::PreMainSequence => Box::new(PreMainSequence),
            StageId::MainSequence => Box::new(MainSequence),
            StageId::RedGiant => Box::new(RedGiant),
            StageId::PlanetaryNebula => Box::new(PlanetaryNebula),
            StageId::WhiteDwarf => Box::new(WhiteDwarf),
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable simulation state shared by whichever stage is active
pub struct StageContext {
    /// Particles of the active stage only
    pub world: World,
    pub phase: Phase,
    pub surface: Surface,
    pub rng: StdRng,
}

impl StageContext {
    pub fn new(surface: Surface, rng: StdRng) -> Self {
        Self {
            world: World::new(),
            phase: Phase::new(),
            surface,
            rng,
        }
    }

    /// Context with a deterministic random source
    pub fn seeded(surface: Surface, seed: u64) -> Self {
        Self::new(surface, StdRng::seed_from_u64(seed))
    }

    pub fn particle_count(&self) -> usize {
        self.world.len() as usize
    }
}

/// Capability contract every life-cycle stage fulfils
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    /// Replace the context's particles and phase with this stage's seed state
    fn init(&self, ctx: &mut StageContext);

    /// Advance one tick and draw. Skipped entirely for non-drawable surfaces.
    fn render(&self, ctx: &mut StageContext, canvas: &mut dyn Canvas);
}

/// Fresh instances of all seven stages, in order
pub fn standard_stages() -> Vec<Box<dyn Stage>> {
    StageId::ALL.iter().map(StageId::model).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    fn context() -> StageContext {
        StageContext::seeded(Surface::new(1024.0, 768.0), 42)
    }

    #[test]
    fn test_ids_round_trip_through_serde() {
        for id in StageId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            let back: StageId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }
    }

    #[test]
    fn test_models_match_ids() {
        for (ordinal, stage) in standard_stages().iter().enumerate() {
            assert_eq!(stage.id().ordinal(), ordinal);
        }
    }

    #[test]
    fn test_pool_sizes_hold_across_renders() {
        let mut canvas = RecordingCanvas::new();
        for stage in standard_stages() {
            let mut ctx = context();
            stage.init(&mut ctx);
            assert_eq!(ctx.particle_count(), stage.id().pool_size(), "{} after init", stage.id());

            for _ in 0..250 {
                stage.render(&mut ctx, &mut canvas);
            }
            assert_eq!(ctx.particle_count(), stage.id().pool_size(), "{} after render", stage.id());
        }
    }

    #[test]
    fn test_init_replaces_foreign_particles() {
        let mut ctx = context();
        Nebula.init(&mut ctx);
        Protostar.init(&mut ctx);
        assert_eq!(ctx.particle_count(), StageId::Protostar.pool_size());
        WhiteDwarf.init(&mut ctx);
        assert_eq!(ctx.particle_count(), 0);
    }

    #[test]
    fn test_zero_area_renders_nothing() {
        for stage in standard_stages() {
            let mut ctx = StageContext::seeded(Surface::new(0.0, 480.0), 1);
            let mut canvas = RecordingCanvas::new();
            stage.init(&mut ctx);
            stage.render(&mut ctx, &mut canvas);
            assert!(canvas.is_empty(), "{} drew on an empty surface", stage.id());
            assert_eq!(ctx.phase.value(), 0.0);
        }
    }

    #[test]
    fn test_renders_leave_canvas_state_clean() {
        for stage in standard_stages() {
            let mut ctx = context();
            let mut canvas = RecordingCanvas::new();
            stage.init(&mut ctx);
            stage.render(&mut ctx, &mut canvas);
            assert_eq!(canvas.save_depth(), 0, "{}", stage.id());
            assert_eq!(canvas.state(), &crate::canvas::DrawState::default(), "{}", stage.id());
        }
    }
}
