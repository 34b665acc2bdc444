//! Collectible reward points

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use crate::consts::POINT_RADIUS;

/// A reward a hider collects by touching it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

impl Point {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: POINT_RADIUS,
        }
    }

    /// Whether a circle at `center` touches this point
    #[inline]
    pub fn collides_with(&self, center: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, center, radius)
    }
}
