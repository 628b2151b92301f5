//! Generation - procedural seeding of particle pools.

mod particles;

pub use particles::*;
