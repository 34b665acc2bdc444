//! Setup and configuration failures
//!
//! Blocked moves and invisible targets are normal control flow and never
//! surface here.

use thiserror::Error;

/// Errors that can occur when configuring or setting up a run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Rejection sampling could not find a clear spot.
    #[error("could not place {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u32 },
    /// Obstacle-set source is not valid JSON of the expected shape.
    #[error("failed to parse obstacle sets: {0}")]
    ObstacleSetParse(#[from] serde_json::Error),
    /// A named obstacle set was requested but is not defined.
    #[error("unknown obstacle set `{0}`")]
    UnknownObstacleSet(String),
}
