//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (hiders by id, then the seeker)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod hider;
pub mod obstacle;
pub mod point;
pub mod seeker;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod visibility;

pub use collision::{Arena, can_move_to, circle_overlaps_rect, circles_overlap};
pub use entity::{AgentKind, Body, Direction, MoveContext};
pub use hider::{Hider, HiderAction};
pub use obstacle::{Obstacle, ObstacleSets, generate_obstacles};
pub use point::Point;
pub use seeker::{Seeker, SeekerAction};
pub use snapshot::{AgentSnapshot, RenderSnapshot};
pub use state::{GameState, RunOutcome};
pub use tick::{TickReport, tick};
pub use visibility::{Viewer, can_see, is_concealed, segment_intersects_rect};
