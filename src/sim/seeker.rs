//! Seeker behaviour: wander, pursue what it can see, catch what it touches

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use super::entity::{AgentKind, Body, Direction, MoveContext};
use super::hider::Hider;
use super::obstacle::Obstacle;
use super::visibility::{Viewer, can_see};
use crate::consts::SEEKER_RADIUS;

/// What the seeker did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekerAction {
    /// Stepped toward the hider with this id
    Pursuing(u32),
    /// Pursuit target in sight but every heading was blocked
    Cornered(u32),
    Wandering,
}

/// The single pursuing agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seeker {
    pub body: Body,
    pub view_radius: f32,
}

impl Seeker {
    pub fn new<R: Rng>(
        pos: Vec2,
        speed: f32,
        view_radius: f32,
        sim_speed: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            body: Body::new(AgentKind::Seeker, pos, SEEKER_RADIUS, speed, sim_speed, rng),
            view_radius,
        }
    }

    /// Whether this hider is a legal pursuit target right now
    pub fn can_see_hider(&self, hider: &Hider, obstacles: &[Obstacle]) -> bool {
        !hider.found
            && !hider.is_concealed(obstacles)
            && can_see(
                Viewer::Seeker,
                self.body.pos,
                hider.body.pos,
                self.view_radius,
                obstacles,
            )
    }

    /// Nearest visible, unfound, unconcealed hider
    pub fn select_target<'h>(
        &self,
        hiders: &'h [Hider],
        obstacles: &[Obstacle],
    ) -> Option<&'h Hider> {
        hiders
            .iter()
            .filter(|h| self.can_see_hider(h, obstacles))
            .min_by(|a, b| {
                let dist_a = a.body.pos.distance_squared(self.body.pos);
                let dist_b = b.body.pos.distance_squared(self.body.pos);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Greedy single-axis step toward `target`
    pub fn chase(&mut self, target: Vec2, ctx: &MoveContext<'_>) -> bool {
        let delta = target - self.body.pos;
        self.body
            .step_axis(Direction::toward(delta), delta, ctx)
            .is_some()
    }

    /// Pursue a visible hider, or wander when none is in sight
    pub fn update<R: Rng>(
        &mut self,
        hiders: &[Hider],
        ctx: &MoveContext<'_>,
        rng: &mut R,
    ) -> SeekerAction {
        let target = self
            .select_target(hiders, ctx.obstacles)
            .map(|h| (h.id, h.body.pos));

        match target {
            Some((id, pos)) => {
                if self.chase(pos, ctx) {
                    SeekerAction::Pursuing(id)
                } else {
                    SeekerAction::Cornered(id)
                }
            }
            None => {
                self.body.wander(rng, ctx);
                SeekerAction::Wandering
            }
        }
    }

    /// Catch every unfound, unconcealed hider the seeker overlaps.
    ///
    /// Returns the ids caught this tick.
    pub fn capture(
        &self,
        hiders: &mut [Hider],
        obstacles: &[Obstacle],
        tick: u64,
        time: f64,
    ) -> Vec<u32> {
        let mut caught = Vec::new();
        for hider in hiders.iter_mut() {
            if hider.found || hider.is_concealed(obstacles) {
                continue;
            }
            if circles_overlap(self.body.pos, self.body.radius, hider.body.pos, hider.body.radius) {
                hider.mark_found(tick, time);
                caught.push(hider.id);
            }
        }
        caught
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Arena;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(obstacles: &[Obstacle]) -> MoveContext<'_> {
        MoveContext {
            arena: Arena::new(400.0, 400.0),
            obstacles,
            sim_speed: 1.0,
        }
    }

    fn setup(seeker_pos: Vec2, hider_positions: &[Vec2]) -> (Seeker, Vec<Hider>, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let seeker = Seeker::new(seeker_pos, 1.0, 100.0, 1.0, &mut rng);
        let hiders = hider_positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Hider::new(i as u32, p, 0.5, 60.0, 1.0, &mut rng))
            .collect();
        (seeker, hiders, rng)
    }

    #[test]
    fn test_targets_nearest_visible() {
        let (seeker, hiders, _) = setup(
            Vec2::new(200.0, 200.0),
            &[Vec2::new(280.0, 200.0), Vec2::new(200.0, 150.0), Vec2::new(50.0, 50.0)],
        );
        let target = seeker.select_target(&hiders, &[]).unwrap();
        assert_eq!(target.id, 1);
    }

    #[test]
    fn test_ignores_found_and_concealed() {
        let bush = Obstacle::permeable(190.0, 140.0, 20.0, 20.0);
        let (seeker, mut hiders, _) = setup(
            Vec2::new(200.0, 200.0),
            &[Vec2::new(260.0, 200.0), Vec2::new(200.0, 150.0)],
        );
        hiders[0].mark_found(1, 0.1);
        assert!(seeker.select_target(&hiders, &[bush]).is_none());
    }

    #[test]
    fn test_chase_moves_along_dominant_axis() {
        let (mut seeker, hiders, mut rng) =
            setup(Vec2::new(200.0, 200.0), &[Vec2::new(250.0, 210.0)]);
        let action = seeker.update(&hiders, &ctx(&[]), &mut rng);
        assert_eq!(action, SeekerAction::Pursuing(0));
        assert_eq!(seeker.body.pos, Vec2::new(201.0, 200.0));
    }

    #[test]
    fn test_chase_routes_around_wall() {
        // Solid wall right in front; the hider is visible above the wall's end
        let wall = Obstacle::new(210.5, 195.0, 10.0, 100.0);
        let (mut seeker, hiders, mut rng) =
            setup(Vec2::new(200.0, 200.0), &[Vec2::new(260.0, 165.0)]);
        let action = seeker.update(&hiders, &ctx(&[wall]), &mut rng);
        assert_eq!(action, SeekerAction::Pursuing(0));
        assert_eq!(seeker.body.pos, Vec2::new(200.0, 199.0));
    }

    #[test]
    fn test_blind_seeker_only_wanders() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut seeker = Seeker::new(Vec2::new(200.0, 200.0), 1.0, 0.0, 1.0, &mut rng);
        let hiders = vec![Hider::new(0, Vec2::new(215.0, 200.0), 0.5, 60.0, 1.0, &mut rng)];
        for _ in 0..200 {
            assert_eq!(seeker.update(&hiders, &ctx(&[]), &mut rng), SeekerAction::Wandering);
        }
    }

    #[test]
    fn test_capture_marks_all_overlapping() {
        let (seeker, mut hiders, _) = setup(
            Vec2::new(200.0, 200.0),
            &[Vec2::new(210.0, 200.0), Vec2::new(195.0, 205.0), Vec2::new(300.0, 300.0)],
        );
        let caught = seeker.capture(&mut hiders, &[], 30, 0.5);
        assert_eq!(caught, vec![0, 1]);
        assert!(hiders[0].found && hiders[1].found && !hiders[2].found);
        assert_eq!(hiders[0].body.speed, 0.0);
        assert_eq!(hiders[1].captured_at, Some(0.5));

        // Already found hiders are not caught twice
        assert!(seeker.capture(&mut hiders, &[], 31, 0.6).is_empty());
        assert_eq!(hiders[0].captured_at, Some(0.5));
    }

    #[test]
    fn test_concealed_hider_cannot_be_caught() {
        let bush = Obstacle::permeable(195.0, 195.0, 30.0, 30.0);
        let (seeker, mut hiders, _) = setup(Vec2::new(200.0, 200.0), &[Vec2::new(205.0, 205.0)]);
        assert!(seeker.capture(&mut hiders, &[bush], 1, 0.0).is_empty());
        assert!(!hiders[0].found);
    }
}
