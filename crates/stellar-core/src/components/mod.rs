//! Component definitions for the particle worlds.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems and stages.

mod common;
mod particles;
mod phase;

pub use common::*;
pub use particles::*;
pub use phase::*;
