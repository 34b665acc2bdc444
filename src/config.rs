//! Run configuration
//!
//! Field names serialize in camelCase so configs written for the browser
//! front-end (`numHiders`, `viewRadius`, ...) load unchanged.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::collision::Arena;
use crate::sim::obstacle::{Obstacle, ObstacleSets};

/// Where a run's obstacles come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ObstacleLayout {
    /// Externally supplied rectangles
    Fixed { obstacles: Vec<Obstacle> },
    /// One layout picked by name from a loaded collection
    Named { name: String, sets: ObstacleSets },
    /// Random spaced-out rectangles, a share of them permeable
    Generated {
        count: u32,
        #[serde(rename = "permeablePercent")]
        permeable_percent: f32,
    },
}

impl Default for ObstacleLayout {
    fn default() -> Self {
        ObstacleLayout::Generated {
            count: 10,
            permeable_percent: 30.0,
        }
    }
}

/// Configuration for a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    /// Number of hiders. Zero is allowed and ends the run immediately.
    pub num_hiders: u32,
    /// Seeker view radius. Zero makes the seeker blind.
    pub view_radius: f32,
    /// Hider view radius (point spotting)
    pub hider_view_radius: f32,
    /// Seeker distance per tick at simulation speed 1.0
    pub seeker_speed: f32,
    /// Hider distance per tick at simulation speed 1.0
    pub hider_speed: f32,
    /// Collectible points. Zero takes points out of play.
    pub num_points: u32,
    /// Scales both the simulated time per tick and every per-tick step
    pub simulation_speed: f32,
    pub obstacles: ObstacleLayout,
    pub arena_width: f32,
    pub arena_height: f32,
    /// Ticks before a run is abandoned as incomplete; `None` runs unbounded
    pub max_ticks: Option<u64>,
    /// RNG seed for reproducible runs; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_hiders: 5,
            view_radius: SEEKER_VIEW_RADIUS,
            hider_view_radius: HIDER_VIEW_RADIUS,
            seeker_speed: SEEKER_SPEED,
            hider_speed: HIDER_SPEED,
            num_points: 0,
            simulation_speed: 1.0,
            obstacles: ObstacleLayout::default(),
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            max_ticks: Some(DEFAULT_MAX_TICKS),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Reject values that would produce undefined motion
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !positive(self.arena_width) || !positive(self.arena_height) {
            return Err(SimError::InvalidConfig(
                "arena dimensions must be positive",
            ));
        }
        if !positive(self.seeker_speed) {
            return Err(SimError::InvalidConfig("seekerSpeed must be positive"));
        }
        if !positive(self.hider_speed) {
            return Err(SimError::InvalidConfig("hiderSpeed must be positive"));
        }
        if !positive(self.simulation_speed) {
            return Err(SimError::InvalidConfig(
                "simulationSpeed must be positive",
            ));
        }
        if !non_negative(self.view_radius) {
            return Err(SimError::InvalidConfig(
                "viewRadius must be non-negative",
            ));
        }
        if !non_negative(self.hider_view_radius) {
            return Err(SimError::InvalidConfig(
                "hiderViewRadius must be non-negative",
            ));
        }
        if self.max_ticks == Some(0) {
            return Err(SimError::InvalidConfig("maxTicks must be positive"));
        }

        let fixed: &[Obstacle] = match &self.obstacles {
            ObstacleLayout::Fixed { obstacles } => obstacles.as_slice(),
            ObstacleLayout::Named { name, sets } => sets.get(name)?,
            ObstacleLayout::Generated {
                permeable_percent, ..
            } => {
                if !(0.0..=100.0).contains(permeable_percent) {
                    return Err(SimError::InvalidConfig(
                        "permeablePercent must be within [0, 100]",
                    ));
                }
                &[]
            }
        };
        let malformed = fixed.iter().any(|o| {
            !o.x.is_finite() || !o.y.is_finite() || !positive(o.width) || !positive(o.height)
        });
        if malformed {
            return Err(SimError::InvalidConfig(
                "obstacles must have finite positions and positive sizes",
            ));
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Simulated seconds per tick
    pub fn tick_seconds(&self) -> f64 {
        BASE_TICK_SECONDS * f64::from(self.simulation_speed)
    }

    /// RNG for this run, from the configured seed or fresh entropy
    pub fn seeded_rng(&self) -> Pcg32 {
        match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::seed_from_u64(rand::random()),
        }
    }
}

/// Configuration for a batch of independent runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
    /// Number of runs, executed one after another
    pub runs: u32,
    /// Template for each run; the seed is treated as the batch base seed
    pub game: SimConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            game: SimConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.game.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
        assert!(HarnessConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_speeds() {
        for config in [
            SimConfig {
                seeker_speed: 0.0,
                ..Default::default()
            },
            SimConfig {
                hider_speed: -1.0,
                ..Default::default()
            },
            SimConfig {
                simulation_speed: f32::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_zero_view_radius_and_zero_hiders_allowed() {
        let config = SimConfig {
            num_hiders: 0,
            view_radius: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = SimConfig {
            view_radius: -5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_obstacles() {
        let config = SimConfig {
            obstacles: ObstacleLayout::Fixed {
                obstacles: vec![Obstacle::new(10.0, 10.0, 0.0, 5.0)],
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_named_layout_must_exist() {
        let mut sets = ObstacleSets::default();
        sets.insert("maze", vec![Obstacle::new(100.0, 100.0, 40.0, 40.0)]);
        let config = SimConfig {
            obstacles: ObstacleLayout::Named {
                name: "maze".into(),
                sets: sets.clone(),
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = SimConfig {
            obstacles: ObstacleLayout::Named {
                name: "forest".into(),
                sets,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::UnknownObstacleSet(name)) if name == "forest"
        ));
    }

    #[test]
    fn test_loads_camel_case_json() {
        let json = r#"{
            "numHiders": 3,
            "viewRadius": 80,
            "hiderSpeed": 0.75,
            "numPoints": 4,
            "obstacles": {"kind": "generated", "count": 5, "permeablePercent": 40},
            "seed": 12
        }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.num_hiders, 3);
        assert_eq!(config.view_radius, 80.0);
        assert_eq!(config.num_points, 4);
        assert_eq!(config.seeker_speed, SEEKER_SPEED);
        assert_eq!(
            config.obstacles,
            ObstacleLayout::Generated {
                count: 5,
                permeable_percent: 40.0
            }
        );
        assert_eq!(config.seed, Some(12));
    }

    #[test]
    fn test_tick_seconds_scale_with_speed() {
        let config = SimConfig {
            simulation_speed: 2.0,
            ..Default::default()
        };
        assert!((config.tick_seconds() - 2.0 / 60.0).abs() < 1e-12);
    }
}
