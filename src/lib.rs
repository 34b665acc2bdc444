//! Hide & Seek - a headless pursuit/evasion simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, visibility, capture, game state)
//! - `config`: Per-run configuration and validation
//! - `harness`: Batch runner and aggregate statistics
//! - `error`: Setup/configuration failures

pub mod config;
pub mod error;
pub mod harness;
pub mod sim;

pub use config::{HarnessConfig, ObstacleLayout, SimConfig};
pub use error::SimError;
pub use harness::{Harness, HarnessReport, RunOutcome, RunResult, StopToken};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Simulated seconds per tick at simulation speed 1.0 (60 Hz)
    pub const BASE_TICK_SECONDS: f64 = 1.0 / 60.0;
    /// Ticks per second of simulated time at simulation speed 1.0
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Agent defaults
    pub const HIDER_RADIUS: f32 = 10.0;
    pub const SEEKER_RADIUS: f32 = 10.0;
    pub const HIDER_SPEED: f32 = 0.5;
    pub const SEEKER_SPEED: f32 = 1.0;
    pub const SEEKER_VIEW_RADIUS: f32 = 100.0;
    pub const HIDER_VIEW_RADIUS: f32 = 60.0;

    /// Collectible point radius
    pub const POINT_RADIUS: f32 = 5.0;

    /// Wandering segment length, in multiples of one second of travel at the
    /// reference speed. Hiders drift longer, seekers turn more often.
    pub const HIDER_MAX_SEGMENTS: u32 = 5;
    pub const SEEKER_MAX_SEGMENTS: u32 = 3;

    /// Minimum gap kept between placed entities and obstacles
    pub const PLACEMENT_MARGIN: f32 = 20.0;
    /// Retry cap for every rejection-sampled placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Obstacle generator ranges
    pub const OBSTACLE_MIN_SIZE: f32 = 20.0;
    pub const OBSTACLE_SIZE_RANGE: f32 = 90.0;
    pub const OBSTACLE_EDGE_INSET: f32 = 50.0;
    pub const OBSTACLE_MIN_DISTANCE: f32 = 20.0;

    /// Half-angle of the hider view cone (render metadata only)
    pub const VIEW_CONE_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

    /// Default tick ceiling: one simulated hour
    pub const DEFAULT_MAX_TICKS: u64 = 60 * 60 * TICKS_PER_SECOND as u64;
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Golden-ratio hash used to derive independent per-run seeds
#[inline]
pub fn derive_seed(base: u64, index: u64) -> u64 {
    index
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(base)
}
