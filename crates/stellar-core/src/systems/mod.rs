//! Systems - per-tick motion rules that operate on particle components

mod drift;
mod expansion;
mod spiral;

pub use drift::*;
pub use expansion::*;
pub use spiral::*;
