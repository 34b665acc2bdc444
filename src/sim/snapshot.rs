//! Per-tick render snapshot
//!
//! Read-only copy of what an observer needs to draw a frame. The simulation
//! never reads these back.

use rand::Rng;
use serde::Serialize;

use super::collision::Arena;
use super::entity::Body;
use super::obstacle::Obstacle;
use super::point::Point;
use super::state::GameState;
use crate::consts::VIEW_CONE_HALF_ANGLE;

/// One agent as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    /// Hider id; `None` for the seeker
    pub id: Option<u32>,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: &'static str,
    pub view_radius: f32,
    /// Heading angle in radians, screen space
    pub facing: f32,
    /// Hiders draw a view cone; the seeker draws a full circle
    pub cone_half_angle: Option<f32>,
    pub found: bool,
    pub concealed: bool,
}

impl AgentSnapshot {
    fn from_body(body: &Body, view_radius: f32) -> Self {
        Self {
            id: None,
            x: body.pos.x,
            y: body.pos.y,
            radius: body.radius,
            color: body.kind.color(),
            view_radius,
            facing: body.direction.angle(),
            cone_half_angle: None,
            found: false,
            concealed: false,
        }
    }
}

/// Everything visible at the end of a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub tick: u64,
    /// Simulated seconds
    pub time: f64,
    pub arena: Arena,
    pub obstacles: Vec<Obstacle>,
    pub hiders: Vec<AgentSnapshot>,
    pub seeker: AgentSnapshot,
    /// Points still in play
    pub points: Vec<Point>,
}

impl RenderSnapshot {
    pub fn capture<R: Rng>(state: &GameState<R>) -> Self {
        let hiders = state
            .hiders
            .iter()
            .map(|h| AgentSnapshot {
                id: Some(h.id),
                cone_half_angle: Some(VIEW_CONE_HALF_ANGLE),
                found: h.found,
                concealed: h.is_concealed(&state.obstacles),
                ..AgentSnapshot::from_body(&h.body, h.view_radius)
            })
            .collect();

        Self {
            tick: state.time_ticks,
            time: state.elapsed_seconds(),
            arena: state.arena,
            obstacles: state.obstacles.clone(),
            hiders,
            seeker: AgentSnapshot::from_body(&state.seeker.body, state.seeker.view_radius),
            points: state.points.clone(),
        }
    }
}
