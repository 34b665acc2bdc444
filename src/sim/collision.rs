//! Overlap tests for circular agents against the arena and obstacles
//!
//! Agents are circles; obstacles are axis-aligned rectangles. Touching is not
//! overlapping: every test here is strict so that "blocked" and "free" are
//! exact complements.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;

/// The playfield: `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a circle lies fully inside the arena
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= 0.0
            && center.x + radius <= self.width
            && center.y - radius >= 0.0
            && center.y + radius <= self.height
    }
}

/// Closest point of the obstacle rectangle to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, obstacle: &Obstacle) -> Vec2 {
    p.clamp(obstacle.min(), obstacle.max())
}

/// Whether a circle overlaps an obstacle rectangle
pub fn circle_overlaps_rect(center: Vec2, radius: f32, obstacle: &Obstacle) -> bool {
    let closest = closest_point_on_rect(center, obstacle);
    center.distance_squared(closest) < radius * radius
}

/// Whether a circle sits within `margin` of an obstacle rectangle
pub fn circle_near_rect(center: Vec2, radius: f32, obstacle: &Obstacle, margin: f32) -> bool {
    circle_overlaps_rect(center, radius + margin, obstacle)
}

/// Whether two circles overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Whether a circle may occupy `center`: inside the arena and clear of every
/// non-permeable obstacle
pub fn can_move_to(center: Vec2, radius: f32, arena: &Arena, obstacles: &[Obstacle]) -> bool {
    arena.contains_circle(center, radius)
        && !obstacles
            .iter()
            .any(|o| !o.permeable && circle_overlaps_rect(center, radius, o))
}
