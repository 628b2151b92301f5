//! Starfield - twinkling background points drawn under every stage

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Color, Paint};
use crate::components::{Surface, Vec2};

pub const DEFAULT_STAR_COUNT: usize = 200;
/// Near-black space backdrop, `#050510`
pub const BACKGROUND: Color = Color::rgb8(0x05, 0x05, 0x10);

/// One background star
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BackgroundStar {
    pub position: Vec2,
    /// Disc radius in `[0, 2)`
    pub size: f32,
    /// Opacity in `[0, 1)`
    pub opacity: f32,
}

/// Background stars, stable until the surface is resized
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    stars: Vec<BackgroundStar>,
}

impl Starfield {
    /// Scatter `count` stars uniformly over a `width` x `height` surface
    pub fn seed(width: f32, height: f32, count: usize, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| BackgroundStar {
                position: Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height),
                size: rng.gen::<f32>() * 2.0,
                opacity: rng.gen::<f32>(),
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[BackgroundStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Paint the backdrop and the stars. Global alpha is back at 1.0 afterward.
    pub fn render(&self, canvas: &mut dyn Canvas, surface: Surface) {
        if !surface.is_drawable() {
            return;
        }

        canvas.fill_rect(surface.bounds(), &Paint::Solid(BACKGROUND));

        let white = Paint::Solid(Color::WHITE);
        for star in &self.stars {
            canvas.set_global_alpha(star.opacity);
            canvas.fill_circle(star.position, star.size, &white);
        }
        canvas.set_global_alpha(1.0);
    }
}
