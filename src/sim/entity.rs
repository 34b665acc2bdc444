//! Shared agent body and wandering movement
//!
//! Hiders and seekers share one `Body` (position, radius, speed, heading and
//! the countdown until the next random turn). Role-specific behaviour lives in
//! `hider` and `seeker` and drives the body through the methods here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Arena, can_move_to};
use super::obstacle::Obstacle;
use crate::consts::*;

/// Heading of an agent. Screen convention: `Up` is -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step vector
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Heading angle in radians (screen space)
    pub fn angle(self) -> f32 {
        let v = self.vector();
        v.y.atan2(v.x)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Dominant-axis heading along `delta`. Ties go to the vertical axis.
    pub fn toward(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// The other three headings to try when `self` is blocked: the
    /// perpendicular leaning toward the goal, the other perpendicular, then
    /// straight back.
    pub fn fallbacks(self, goal_delta: Vec2) -> [Direction; 3] {
        let (first, second) = match self {
            Direction::Up | Direction::Down => {
                if goal_delta.x < 0.0 {
                    (Direction::Left, Direction::Right)
                } else {
                    (Direction::Right, Direction::Left)
                }
            }
            Direction::Left | Direction::Right => {
                if goal_delta.y < 0.0 {
                    (Direction::Up, Direction::Down)
                } else {
                    (Direction::Down, Direction::Up)
                }
            }
        };
        [first, second, self.opposite()]
    }
}

/// Capability tag for an agent body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Hider,
    Seeker,
}

impl AgentKind {
    /// Upper bound (inclusive) of a wandering segment, in seconds of travel at
    /// the reference speed
    pub fn max_segments(self) -> u32 {
        match self {
            AgentKind::Hider => HIDER_MAX_SEGMENTS,
            AgentKind::Seeker => SEEKER_MAX_SEGMENTS,
        }
    }

    /// Speed at which a one-second segment takes exactly one second
    pub fn reference_speed(self) -> f32 {
        match self {
            AgentKind::Hider => HIDER_SPEED,
            AgentKind::Seeker => SEEKER_SPEED,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AgentKind::Hider => "blue",
            AgentKind::Seeker => "red",
        }
    }
}

/// Everything a body needs to validate a move
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub arena: Arena,
    pub obstacles: &'a [Obstacle],
    /// Multiplier applied to every per-tick step
    pub sim_speed: f32,
}

/// Movement state shared by every agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: AgentKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Distance per tick at simulation speed 1.0
    pub speed: f32,
    pub direction: Direction,
    /// Ticks left before the next random turn
    pub move_ticks: u32,
}

impl Body {
    pub fn new<R: Rng>(
        kind: AgentKind,
        pos: Vec2,
        radius: f32,
        speed: f32,
        sim_speed: f32,
        rng: &mut R,
    ) -> Self {
        let mut body = Self {
            kind,
            pos,
            radius,
            speed,
            direction: Direction::Up,
            move_ticks: 0,
        };
        body.change_direction(rng, sim_speed);
        body
    }

    /// Distance covered by one tick
    #[inline]
    pub fn step_len(&self, sim_speed: f32) -> f32 {
        self.speed * sim_speed
    }

    /// Draw a fresh countdown. Longer for slower agents, so a segment covers
    /// roughly the same distance at any speed.
    pub fn reset_countdown<R: Rng>(&mut self, rng: &mut R, sim_speed: f32) {
        let step = self.step_len(sim_speed);
        if step <= 0.0 {
            self.move_ticks = 0;
            return;
        }
        let segments = rng.random_range(1..=self.kind.max_segments());
        let distance =
            segments as f32 * TICKS_PER_SECOND as f32 * self.kind.reference_speed();
        self.move_ticks = ((distance / step).ceil() as u32).max(1);
    }

    /// Random new heading plus a fresh countdown
    pub fn change_direction<R: Rng>(&mut self, rng: &mut R, sim_speed: f32) {
        self.direction = Direction::random(rng);
        self.reset_countdown(rng, sim_speed);
    }

    /// Move to `dest` if the body fits there
    pub fn try_move(&mut self, dest: Vec2, ctx: &MoveContext<'_>) -> bool {
        if can_move_to(dest, self.radius, &ctx.arena, ctx.obstacles) {
            self.pos = dest;
            true
        } else {
            false
        }
    }

    /// One random-walk tick. Returns whether the body moved.
    pub fn wander<R: Rng>(&mut self, rng: &mut R, ctx: &MoveContext<'_>) -> bool {
        if self.move_ticks == 0 {
            self.change_direction(rng, ctx.sim_speed);
        }

        let dest = self.pos + self.direction.vector() * self.step_len(ctx.sim_speed);
        let moved = self.try_move(dest, ctx);
        if !moved {
            self.change_direction(rng, ctx.sim_speed);
        }

        self.move_ticks = self.move_ticks.saturating_sub(1);
        moved
    }

    /// Step one tick along `intended`, falling back to the other three
    /// headings when blocked. Keeps the heading that worked; returns `None`
    /// when boxed in.
    pub fn step_axis(
        &mut self,
        intended: Direction,
        goal_delta: Vec2,
        ctx: &MoveContext<'_>,
    ) -> Option<Direction> {
        let step = self.step_len(ctx.sim_speed);
        let candidates = std::iter::once(intended).chain(intended.fallbacks(goal_delta));
        for dir in candidates {
            if self.try_move(self.pos + dir.vector() * step, ctx) {
                self.direction = dir;
                return Some(dir);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(arena: Arena, obstacles: &[Obstacle]) -> MoveContext<'_> {
        MoveContext {
            arena,
            obstacles,
            sim_speed: 1.0,
        }
    }

    fn body(pos: Vec2) -> Body {
        let mut rng = Pcg32::seed_from_u64(1);
        Body::new(AgentKind::Hider, pos, 10.0, 1.0, 1.0, &mut rng)
    }

    #[test]
    fn test_toward_uses_dominant_axis() {
        assert_eq!(Direction::toward(Vec2::new(5.0, 1.0)), Direction::Right);
        assert_eq!(Direction::toward(Vec2::new(-5.0, 1.0)), Direction::Left);
        assert_eq!(Direction::toward(Vec2::new(1.0, 5.0)), Direction::Down);
        assert_eq!(Direction::toward(Vec2::new(1.0, -5.0)), Direction::Up);
    }

    #[test]
    fn test_fallbacks_cover_other_three() {
        for dir in Direction::ALL {
            let fallbacks = dir.fallbacks(Vec2::new(1.0, 1.0));
            assert!(!fallbacks.contains(&dir));
            assert_eq!(fallbacks[2], dir.opposite());
        }
        assert_eq!(
            Direction::Up.fallbacks(Vec2::new(-3.0, -9.0)),
            [Direction::Left, Direction::Right, Direction::Down]
        );
    }

    #[test]
    fn test_countdown_scales_inversely_with_speed() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut slow = body(Vec2::new(50.0, 50.0));
        slow.speed = 0.5;
        let mut fast = slow.clone();
        fast.speed = 2.0;

        // Same random draw for both
        let mut rng2 = rng.clone();
        slow.reset_countdown(&mut rng, 1.0);
        fast.reset_countdown(&mut rng2, 1.0);
        assert_eq!(slow.move_ticks, fast.move_ticks * 4);

        let slow_distance = slow.move_ticks as f32 * slow.step_len(1.0);
        let fast_distance = fast.move_ticks as f32 * fast.step_len(1.0);
        assert!((slow_distance - fast_distance).abs() < 1e-3);
    }

    #[test]
    fn test_wander_turns_when_blocked() {
        let arena = Arena::new(100.0, 100.0);
        let mut b = body(Vec2::new(10.0, 50.0));
        b.direction = Direction::Left;
        b.move_ticks = 50;
        let mut rng = Pcg32::seed_from_u64(4);

        let moved = b.wander(&mut rng, &ctx(arena, &[]));
        assert!(!moved);
        assert_eq!(b.pos, Vec2::new(10.0, 50.0));
        assert!(b.move_ticks > 0);
    }

    #[test]
    fn test_wander_never_enters_solid_obstacle() {
        let arena = Arena::new(200.0, 200.0);
        let obstacles = [Obstacle::new(80.0, 80.0, 40.0, 40.0)];
        let mut b = body(Vec2::new(40.0, 40.0));
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..5_000 {
            b.wander(&mut rng, &ctx(arena, &obstacles));
            assert!(can_move_to(b.pos, b.radius, &arena, &obstacles));
        }
    }

    #[test]
    fn test_step_axis_slides_around_wall() {
        let arena = Arena::new(200.0, 200.0);
        // Wall directly to the right
        let obstacles = [Obstacle::new(60.5, 0.0, 10.0, 100.0)];
        let mut b = body(Vec2::new(50.0, 50.0));

        let taken = b.step_axis(
            Direction::Right,
            Vec2::new(40.0, 10.0),
            &ctx(arena, &obstacles),
        );
        assert_eq!(taken, Some(Direction::Down));
        assert_eq!(b.pos, Vec2::new(50.0, 51.0));
        assert_eq!(b.direction, Direction::Down);
    }

    #[test]
    fn test_step_axis_boxed_in() {
        let arena = Arena::new(20.0, 20.0);
        let mut b = body(Vec2::new(10.0, 10.0));
        assert_eq!(
            b.step_axis(Direction::Up, Vec2::ZERO, &ctx(arena, &[])),
            None
        );
        assert_eq!(b.pos, Vec2::new(10.0, 10.0));
    }
}
