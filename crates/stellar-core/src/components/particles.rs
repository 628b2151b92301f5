//! Particle components. Each stage spawns the subset it needs.

use serde::{Deserialize, Serialize};

use super::Vec2;
use crate::canvas::Color;

/// Cartesian position in surface coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

/// Per-tick displacement
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec2);

/// Polar motion around the surface center
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Orbit {
    /// Current angle in radians
    pub angle: f32,
    /// Distance from the center
    pub distance: f32,
    /// Angular speed in radians per tick
    pub speed: f32,
}

impl Orbit {
    pub fn position(&self, center: Vec2) -> Vec2 {
        center + Vec2::from_polar(self.angle, self.distance)
    }
}

/// Remaining ticks before the particle is recycled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    pub fn expired(&self) -> bool {
        self.remaining < 0.0
    }
}

/// How a particle is drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Appearance {
    /// Disc radius
    pub size: f32,
    pub color: Color,
}

impl Appearance {
    pub fn new(size: f32, color: Color) -> Self {
        Self { size, color }
    }
}

/// Corona ray attached to the main-sequence star
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Ray {
    /// Seed angle in radians
    pub angle: f32,
    /// Extra length beyond the star's base radius
    pub length: f32,
    /// Rotation applied before this ray is drawn, in radians
    pub speed: f32,
}
