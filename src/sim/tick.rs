//! Fixed timestep simulation tick
//!
//! One tick, in order:
//! 1. every unfound hider decides and moves (by id), then collects the points
//!    it now overlaps
//! 2. the seeker pursues or wanders against the hiders' new positions
//! 3. the seeker catches every hider it overlaps
//! 4. termination is evaluated
//!
//! Updates are applied in place, so later agents see earlier agents' moves
//! from the same tick.

use log::{debug, info};
use rand::Rng;

use super::entity::MoveContext;
use super::seeker::SeekerAction;
use super::state::{GameState, RunOutcome};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter after this tick
    pub tick: u64,
    /// `None` when the run was already over and nothing moved
    pub seeker_action: Option<SeekerAction>,
    /// Hider ids caught this tick
    pub captured: Vec<u32>,
    /// Points taken by hiders this tick
    pub points_taken: u32,
    pub outcome: Option<RunOutcome>,
}

/// Advance the run by one fixed timestep. A finished run is left untouched.
pub fn tick<R: Rng>(state: &mut GameState<R>) -> TickReport {
    if state.outcome.is_some() {
        return TickReport {
            tick: state.time_ticks,
            outcome: state.outcome,
            ..Default::default()
        };
    }

    state.time_ticks += 1;
    let time = state.elapsed_seconds();

    let ctx = MoveContext {
        arena: state.arena,
        obstacles: &state.obstacles,
        sim_speed: state.config.simulation_speed,
    };

    let mut points_taken = 0;
    for hider in state.hiders.iter_mut() {
        hider.update(&state.seeker, &state.points, &ctx, &mut state.rng);
        let taken = hider.collect(&mut state.points);
        if taken > 0 {
            debug!("Hider {} collected {} point(s) at {:.2}s", hider.id, taken, time);
        }
        points_taken += taken;
    }

    let seeker_action = state.seeker.update(&state.hiders, &ctx, &mut state.rng);

    let captured = state
        .seeker
        .capture(&mut state.hiders, &state.obstacles, state.time_ticks, time);
    for id in &captured {
        debug!("Hider {} found at {:.2}s", id, time);
    }

    state.outcome = state.evaluate_outcome();
    if state.outcome.is_none()
        && state
            .config
            .max_ticks
            .is_some_and(|max| state.time_ticks >= max)
    {
        state.outcome = Some(RunOutcome::Incomplete);
    }
    if let Some(outcome) = state.outcome {
        info!(
            "Run over after {} ticks ({:.2}s): {:?}, {} of {} points collected",
            state.time_ticks,
            time,
            outcome,
            state.points_collected(),
            state.total_points
        );
    }

    TickReport {
        tick: state.time_ticks,
        seeker_action: Some(seeker_action),
        captured,
        points_taken,
        outcome: state.outcome,
    }
}
