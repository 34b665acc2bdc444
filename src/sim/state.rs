//! Game state and setup
//!
//! A `GameState` owns everything one run needs: the resolved obstacle layout,
//! the agents, the remaining points and the run RNG. Setup places every
//! entity by rejection sampling so nothing starts overlapping anything else.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Arena, circle_near_rect};
use super::hider::Hider;
use super::obstacle::{Obstacle, generate_obstacles};
use super::point::Point;
use super::seeker::Seeker;
use crate::config::{ObstacleLayout, SimConfig};
use crate::consts::*;
use crate::error::SimError;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    /// Hiders took every point
    AllPointsCollected,
    /// The seeker found every hider
    AllHidersFound,
    /// Tick ceiling reached first
    Incomplete,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState<R: Rng = Pcg32> {
    pub config: SimConfig,
    pub arena: Arena,
    pub obstacles: Vec<Obstacle>,
    /// Sorted by id; updated in this order every tick
    pub hiders: Vec<Hider>,
    pub seeker: Seeker,
    /// Points still in play
    pub points: Vec<Point>,
    /// Points placed at setup
    pub total_points: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the run is over
    pub outcome: Option<RunOutcome>,
    pub(super) rng: R,
}

impl GameState<Pcg32> {
    /// Set up a run seeded from the config (or entropy when unseeded)
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let rng = config.seeded_rng();
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameState<R> {
    /// Set up a run drawing every random decision from `rng`
    pub fn with_rng(config: SimConfig, mut rng: R) -> Result<Self, SimError> {
        config.validate()?;
        let arena = config.arena();

        let obstacles = match &config.obstacles {
            ObstacleLayout::Fixed { obstacles } => obstacles.clone(),
            ObstacleLayout::Named { name, sets } => sets.get(name)?.to_vec(),
            ObstacleLayout::Generated {
                count,
                permeable_percent,
            } => generate_obstacles(
                &mut rng,
                *count,
                *permeable_percent,
                arena.width,
                arena.height,
            )?,
        };

        let mut occupied: Vec<(Vec2, f32)> = Vec::new();

        let mut hiders = Vec::with_capacity(config.num_hiders as usize);
        for id in 0..config.num_hiders {
            let pos = sample_clear(&mut rng, arena, HIDER_RADIUS, "hider", |p| {
                spot_clear(p, HIDER_RADIUS, &obstacles, &occupied)
            })?;
            occupied.push((pos, HIDER_RADIUS));
            hiders.push(Hider::new(
                id,
                pos,
                config.hider_speed,
                config.hider_view_radius,
                config.simulation_speed,
                &mut rng,
            ));
        }

        let mut points = Vec::with_capacity(config.num_points as usize);
        for id in 0..config.num_points {
            let pos = sample_clear(&mut rng, arena, POINT_RADIUS, "point", |p| {
                spot_clear(p, POINT_RADIUS, &obstacles, &occupied)
            })?;
            occupied.push((pos, POINT_RADIUS));
            points.push(Point::new(id, pos));
        }

        let hider_spots = &occupied[..hiders.len()];
        let seeker_pos = sample_clear(&mut rng, arena, SEEKER_RADIUS, "seeker", |p| {
            spot_clear(p, SEEKER_RADIUS, &obstacles, hider_spots)
        })?;
        let seeker = Seeker::new(
            seeker_pos,
            config.seeker_speed,
            config.view_radius,
            config.simulation_speed,
            &mut rng,
        );

        info!(
            "Run set up: {} hiders, {} points, {} obstacles",
            hiders.len(),
            points.len(),
            obstacles.len()
        );

        let mut state = Self {
            total_points: config.num_points,
            config,
            arena,
            obstacles,
            hiders,
            seeker,
            points,
            time_ticks: 0,
            outcome: None,
            rng,
        };
        state.outcome = state.evaluate_outcome();
        Ok(state)
    }

    /// Termination condition, ignoring the tick ceiling. Point collection wins
    /// ties since hiders move before the seeker captures.
    pub fn evaluate_outcome(&self) -> Option<RunOutcome> {
        if self.total_points > 0 && self.points.is_empty() {
            Some(RunOutcome::AllPointsCollected)
        } else if self.hiders.iter().all(|h| h.found) {
            Some(RunOutcome::AllHidersFound)
        } else {
            None
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Simulated seconds elapsed
    pub fn elapsed_seconds(&self) -> f64 {
        self.time_ticks as f64 * self.config.tick_seconds()
    }

    /// Capture timestamps in the order they happened
    pub fn capture_times(&self) -> Vec<f64> {
        let mut captures: Vec<(u64, u32, f64)> = self
            .hiders
            .iter()
            .filter_map(|h| Some((h.captured_tick?, h.id, h.captured_at?)))
            .collect();
        captures.sort_by_key(|&(tick, id, _)| (tick, id));
        captures.into_iter().map(|(_, _, time)| time).collect()
    }

    pub fn points_collected(&self) -> u32 {
        self.total_points - self.points.len() as u32
    }

    pub fn hiders_remaining(&self) -> usize {
        self.hiders.iter().filter(|h| !h.found).count()
    }

    /// A finished run with no points left on the field
    pub fn is_win(&self) -> bool {
        matches!(
            self.outcome,
            Some(RunOutcome::AllPointsCollected | RunOutcome::AllHidersFound)
        ) && self.points.is_empty()
    }
}

/// Whether a circle at `pos` keeps the placement margin from every obstacle
/// and every already occupied circle
fn spot_clear(pos: Vec2, radius: f32, obstacles: &[Obstacle], occupied: &[(Vec2, f32)]) -> bool {
    obstacles
        .iter()
        .all(|o| !circle_near_rect(pos, radius, o, PLACEMENT_MARGIN))
        && occupied
            .iter()
            .all(|&(other, r)| pos.distance(other) >= radius + r + PLACEMENT_MARGIN)
}

/// Draw in-bounds positions until `is_clear` accepts one
fn sample_clear<R: Rng>(
    rng: &mut R,
    arena: Arena,
    radius: f32,
    what: &'static str,
    mut is_clear: impl FnMut(Vec2) -> bool,
) -> Result<Vec2, SimError> {
    if arena.width < radius * 2.0 || arena.height < radius * 2.0 {
        return Err(SimError::InvalidConfig("arena is too small for its agents"));
    }
    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let pos = Vec2::new(
            rng.random_range(radius..=arena.width - radius),
            rng.random_range(radius..=arena.height - radius),
        );
        if is_clear(pos) {
            if attempt > 1 {
                debug!("Placed {} after {} attempts", what, attempt);
            }
            return Ok(pos);
        }
    }
    Err(SimError::PlacementExhausted {
        what,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}
