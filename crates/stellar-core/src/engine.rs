//! Simulation engine - main entry point for running the animation

use crate::canvas::Canvas;
use crate::catalog::{CatalogError, Language, StageCatalog, StageInfo};
use crate::components::{Phase, Surface};
use crate::config::EngineConfig;
use crate::sequencer::{Sequencer, Transition};
use crate::stages::{StageContext, StageId};
use crate::starfield::Starfield;

/// Owns every piece of mutable animation state.
///
/// Exactly one stage is active. Any change of stage, and any resize,
/// re-runs the active stage's `init` before the next [`tick`](Self::tick).
pub struct SimulationEngine {
    sequencer: Sequencer,
    context: StageContext,
    starfield: Starfield,
    config: EngineConfig,
}

impl SimulationEngine {
    /// Create an engine on the first stage with the given catalog
    pub fn new(config: EngineConfig, catalog: StageCatalog) -> Self {
        let surface = config.surface();
        let mut rng = config.rng();
        let starfield = Starfield::seed(surface.width, surface.height, config.star_count, &mut rng);

        let mut engine = Self {
            sequencer: Sequencer::new(catalog),
            context: StageContext::new(surface, rng),
            starfield,
            config,
        };
        engine.init_active();

        log::info!(
            "Engine ready: {} stages, {}x{} surface, seed {:?}",
            engine.stage_count(),
            surface.width,
            surface.height,
            engine.config.seed
        );
        engine
    }

    /// Create an engine with one of the bundled catalogs
    pub fn with_language(config: EngineConfig, language: Language) -> Result<Self, CatalogError> {
        Ok(Self::new(config, StageCatalog::bundled(language)?))
    }

    /// Surface changed size: re-seed the starfield and restart the active stage
    pub fn resize(&mut self, width: f32, height: f32) {
        let surface = Surface::new(width, height);
        self.context.surface = surface;
        self.starfield = Starfield::seed(width, height, self.config.star_count, &mut self.context.rng);
        self.init_active();
        log::info!("Surface resized to {}x{}", width, height);
    }

    /// Render one frame: starfield first, then the active stage
    pub fn tick(&mut self, canvas: &mut dyn Canvas) {
        let surface = self.context.surface;
        if !surface.is_drawable() {
            return;
        }
        self.starfield.render(canvas, surface);
        self.sequencer.current().model.render(&mut self.context, canvas);
    }

    pub fn advance(&mut self) -> bool {
        self.apply(Transition::Advance)
    }

    pub fn retreat(&mut self) -> bool {
        self.apply(Transition::Retreat)
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        self.apply(Transition::JumpTo(index))
    }

    /// Apply a navigation request, re-initializing the stage if it changed
    pub fn apply(&mut self, transition: Transition) -> bool {
        let changed = self.sequencer.apply(transition);
        if changed {
            self.init_active();
        }
        changed
    }

    fn init_active(&mut self) {
        let entry = self.sequencer.current();
        entry.model.init(&mut self.context);
        log::debug!(
            "Stage {} ({}) initialized with {} particles",
            self.sequencer.current_index(),
            entry.info.id,
            self.context.particle_count()
        );
    }

    pub fn current_info(&self) -> &StageInfo {
        &self.sequencer.current().info
    }

    pub fn current_id(&self) -> StageId {
        self.sequencer.current_id()
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn stage_count(&self) -> usize {
        self.sequencer.len()
    }

    pub fn is_first(&self) -> bool {
        self.sequencer.is_first()
    }

    pub fn is_last(&self) -> bool {
        self.sequencer.is_last()
    }

    pub fn stage_info(&self, index: usize) -> Option<&StageInfo> {
        self.sequencer.info(index)
    }

    /// Particles (or rays) held by the active stage
    pub fn particle_count(&self) -> usize {
        self.context.particle_count()
    }

    pub fn phase(&self) -> Phase {
        self.context.phase
    }

    pub fn surface(&self) -> Surface {
        self.context.surface
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active stage state, for inspection
    pub fn context(&self) -> &StageContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut StageContext {
        &mut self.context
    }
}
