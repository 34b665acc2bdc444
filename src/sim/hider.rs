//! Hider behaviour: flee when seen, grab nearby points, otherwise wander
//!
//! Per tick, visibility is judged first. A hider the seeker can see flees
//! (toward advantageous cover, else straight away) and does nothing else that
//! tick. Only a hider that is not fleeing goes after points.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{AgentKind, Body, Direction, MoveContext};
use super::obstacle::Obstacle;
use super::point::Point;
use super::seeker::Seeker;
use super::visibility::{Viewer, can_see, is_concealed};
use crate::consts::HIDER_RADIUS;
use crate::direction_to;

/// What a hider did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiderAction {
    /// Already found; frozen in place
    Idle,
    Fled,
    SoughtPoint,
    Wandered,
    /// Wanted to move somewhere but every heading was blocked
    Stuck,
}

/// An evading agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hider {
    pub id: u32,
    pub body: Body,
    pub view_radius: f32,
    /// Set once, when caught. Never cleared.
    pub found: bool,
    /// Simulated seconds at capture
    pub captured_at: Option<f64>,
    pub captured_tick: Option<u64>,
    pub points_collected: u32,
}

impl Hider {
    pub fn new<R: Rng>(
        id: u32,
        pos: Vec2,
        speed: f32,
        view_radius: f32,
        sim_speed: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            body: Body::new(AgentKind::Hider, pos, HIDER_RADIUS, speed, sim_speed, rng),
            view_radius,
            found: false,
            captured_at: None,
            captured_tick: None,
            points_collected: 0,
        }
    }

    /// Touching any permeable obstacle counts as hidden
    pub fn is_concealed(&self, obstacles: &[Obstacle]) -> bool {
        is_concealed(self.body.pos, self.body.radius, obstacles)
    }

    /// Freeze the hider permanently
    pub fn mark_found(&mut self, tick: u64, time: f64) {
        if self.found {
            return;
        }
        self.found = true;
        self.body.speed = 0.0;
        self.captured_tick = Some(tick);
        self.captured_at = Some(time);
    }

    /// Whether the hider itself has line of sight to `target`
    pub fn can_see(&self, target: Vec2, obstacles: &[Obstacle]) -> bool {
        can_see(Viewer::Hider, self.body.pos, target, self.view_radius, obstacles)
    }

    /// Nearest permeable obstacle that is strictly closer to this hider than
    /// to the seeker
    pub fn cover_from<'o>(
        &self,
        seeker_pos: Vec2,
        obstacles: &'o [Obstacle],
    ) -> Option<&'o Obstacle> {
        obstacles
            .iter()
            .filter(|o| o.permeable)
            .filter(|o| self.body.pos.distance(o.center()) < seeker_pos.distance(o.center()))
            .min_by(|a, b| {
                let dist_a = self.body.pos.distance_squared(a.center());
                let dist_b = self.body.pos.distance_squared(b.center());
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Escape heading and the goal offset it aims at
    pub fn escape_heading(&self, seeker_pos: Vec2, obstacles: &[Obstacle]) -> (Direction, Vec2) {
        let goal = match self.cover_from(seeker_pos, obstacles) {
            Some(cover) => cover.center() - self.body.pos,
            None => self.body.pos - seeker_pos,
        };
        (Direction::toward(goal), goal)
    }

    /// Nearest active point this hider can see
    pub fn nearest_visible_point<'p>(
        &self,
        points: &'p [Point],
        obstacles: &[Obstacle],
    ) -> Option<&'p Point> {
        points
            .iter()
            .filter(|p| self.can_see(p.pos, obstacles))
            .min_by(|a, b| {
                let dist_a = self.body.pos.distance_squared(a.pos);
                let dist_b = self.body.pos.distance_squared(b.pos);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Straight-line step toward `target`, snapping onto it when within one
    /// step. Falls back to axis-aligned headings when the direct step is
    /// blocked.
    pub fn seek_point(&mut self, target: Vec2, ctx: &MoveContext<'_>) -> bool {
        let delta = target - self.body.pos;
        let step = self.body.step_len(ctx.sim_speed);
        let dest = if delta.length() <= step {
            target
        } else {
            self.body.pos + direction_to(self.body.pos, target) * step
        };

        if self.body.try_move(dest, ctx) {
            self.body.direction = Direction::toward(delta);
            return true;
        }
        self.body
            .step_axis(Direction::toward(delta), delta, ctx)
            .is_some()
    }

    /// Decide and move for one tick
    pub fn update<R: Rng>(
        &mut self,
        seeker: &Seeker,
        points: &[Point],
        ctx: &MoveContext<'_>,
        rng: &mut R,
    ) -> HiderAction {
        if self.found {
            return HiderAction::Idle;
        }

        if seeker.can_see_hider(self, ctx.obstacles) {
            let (heading, goal) = self.escape_heading(seeker.body.pos, ctx.obstacles);
            self.body.direction = heading;
            self.body.reset_countdown(rng, ctx.sim_speed);
            let moved = self.body.step_axis(heading, goal, ctx).is_some();
            self.body.move_ticks = self.body.move_ticks.saturating_sub(1);
            return if moved {
                HiderAction::Fled
            } else {
                HiderAction::Stuck
            };
        }

        if let Some(target) = self.nearest_visible_point(points, ctx.obstacles).map(|p| p.pos) {
            return if self.seek_point(target, ctx) {
                HiderAction::SoughtPoint
            } else {
                HiderAction::Stuck
            };
        }

        self.body.wander(rng, ctx);
        HiderAction::Wandered
    }

    /// Remove every point this hider overlaps. Returns how many were taken.
    pub fn collect(&mut self, points: &mut Vec<Point>) -> u32 {
        if self.found {
            return 0;
        }
        let before = points.len();
        let (pos, radius) = (self.body.pos, self.body.radius);
        points.retain(|p| !p.collides_with(pos, radius));
        let taken = (before - points.len()) as u32;
        self.points_collected += taken;
        taken
    }
}
