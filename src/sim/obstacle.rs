//! Static rectangular obstacles
//!
//! An obstacle is an axis-aligned rectangle given by its top-left corner and
//! size (screen convention: +y points down). Permeable obstacles let agents
//! walk through them and give hiders cover from the seeker.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// An obstacle rectangle. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Blocks seeker sight only; agents may pass through
    #[serde(default)]
    pub permeable: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            permeable: false,
        }
    }

    pub fn permeable(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            permeable: true,
            ..Self::new(x, y, width, height)
        }
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed containment test
    pub fn contains_point(&self, p: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// The four edges as segments: top, right, bottom, left
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let (min, max) = (self.min(), self.max());
        let top_right = Vec2::new(max.x, min.y);
        let bottom_left = Vec2::new(min.x, max.y);
        [
            (min, top_right),
            (top_right, max),
            (max, bottom_left),
            (bottom_left, min),
        ]
    }
}

/// Obstacle layouts keyed by name, as loaded from an external JSON source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleSets {
    sets: BTreeMap<String, Vec<Obstacle>>,
}

impl ObstacleSets {
    /// Parse `{ "<name>": [ {x, y, width, height, permeable}, ... ], ... }`
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let sets: Self = serde_json::from_str(json)?;
        log::debug!("Loaded {} obstacle sets", sets.sets.len());
        Ok(sets)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, name: &str) -> Result<&[Obstacle], SimError> {
        self.sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SimError::UnknownObstacleSet(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, obstacles: Vec<Obstacle>) {
        self.sets.insert(name.into(), obstacles);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

/// Generate a random layout of `count` spaced-out obstacles
///
/// Each obstacle is permeable with probability `permeable_percent / 100`.
pub fn generate_obstacles<R: Rng>(
    rng: &mut R,
    count: u32,
    permeable_percent: f32,
    arena_width: f32,
    arena_height: f32,
) -> Result<Vec<Obstacle>, SimError> {
    if !(0.0..=100.0).contains(&permeable_percent) {
        return Err(SimError::InvalidConfig(
            "permeable_percent must be within [0, 100]",
        ));
    }
    if arena_width <= OBSTACLE_EDGE_INSET || arena_height <= OBSTACLE_EDGE_INSET {
        return Err(SimError::InvalidConfig(
            "arena is too small to generate obstacles",
        ));
    }

    let permeable_chance = f64::from(permeable_percent / 100.0);
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let mut placed = None;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = rng.random_range(0.0..arena_width - OBSTACLE_EDGE_INSET);
            let y = rng.random_range(0.0..arena_height - OBSTACLE_EDGE_INSET);
            let width = (rng.random::<f32>() * OBSTACLE_SIZE_RANGE + OBSTACLE_MIN_SIZE)
                .min(arena_width - x);
            let height = (rng.random::<f32>() * OBSTACLE_SIZE_RANGE + OBSTACLE_MIN_SIZE)
                .min(arena_height - y);
            let candidate = Obstacle::new(x, y, width, height);

            if !too_close(&obstacles, &candidate) {
                placed = Some(candidate);
                break;
            }
        }

        let Some(mut obstacle) = placed else {
            return Err(SimError::PlacementExhausted {
                what: "obstacle",
                attempts: MAX_PLACEMENT_ATTEMPTS,
            });
        };
        obstacle.permeable = rng.random_bool(permeable_chance);
        obstacles.push(obstacle);
    }

    log::info!(
        "Generated {} obstacles ({} permeable)",
        obstacles.len(),
        obstacles.iter().filter(|o| o.permeable).count()
    );
    Ok(obstacles)
}

/// Corner-distance spacing rule for generated layouts
fn too_close(existing: &[Obstacle], candidate: &Obstacle) -> bool {
    existing.iter().any(|o| {
        let spacing = OBSTACLE_MIN_DISTANCE
            + candidate
                .width
                .max(candidate.height)
                .max(o.width)
                .max(o.height);
        o.min().distance(candidate.min()) < spacing
    })
}
