//! Stellar Core - Stellar Life Cycle Animation Engine
//!
//! A staged, procedural particle animation of a star's life: nebula,
//! protostar, pre-main sequence, main sequence, red giant, planetary nebula
//! and white dwarf. Each stage seeds its own particle pool and advances and
//! draws it once per frame over a shared twinkling starfield.
//!
//! # Architecture
//!
//! - **Components**: pure data (positions, orbits, lifetimes, rays)
//! - **Generation**: seeding of each stage's particle pool into a `hecs` world
//! - **Systems**: per-tick motion rules (drift, spiral infall, expansion)
//! - **Stages**: the seven [`stages::Stage`] models tying the above together
//! - **Sequencer / Engine / Driver**: navigation, state ownership, frame loop
//! - **Canvas**: the drawing capability stages render through
//!
//! # Example
//!
//! ```rust,no_run
//! use stellar_core::prelude::*;
//!
//! let mut engine = SimulationEngine::with_language(EngineConfig::seeded(7), Language::English)?;
//! let mut canvas = PixelCanvas::new(1280, 720);
//! let mut driver = AnimationDriver::new();
//!
//! driver.request(Transition::Advance);
//! driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(600));
//! # Ok::<(), stellar_core::catalog::CatalogError>(())
//! ```

pub mod canvas;
pub mod catalog;
pub mod components;
pub mod config;
pub mod driver;
pub mod engine;
pub mod generation;
pub mod sequencer;
pub mod stages;
pub mod starfield;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::canvas::{Canvas, PixelCanvas, RecordingCanvas};
    pub use crate::catalog::{Language, StageCatalog, StageInfo};
    pub use crate::components::Surface;
    pub use crate::config::EngineConfig;
    pub use crate::driver::{AnimationDriver, FixedTicks, Tick, TickSource};
    pub use crate::engine::SimulationEngine;
    pub use crate::sequencer::Transition;
    pub use crate::stages::StageId;
}
