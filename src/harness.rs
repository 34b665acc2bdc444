//! Batch runner
//!
//! Runs games one after another, each from its own derived seed, and folds
//! the per-run results into summary statistics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::derive_seed;
use crate::error::SimError;
use crate::sim::snapshot::RenderSnapshot;
use crate::sim::state::GameState;
use crate::sim::tick::tick;

pub use crate::sim::state::RunOutcome;

/// Cooperative cancellation shared between the harness and its caller
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the harness to stop; the run in progress is discarded
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Zero-based run index
    pub run: u32,
    pub seed: u64,
    /// Simulated seconds until termination
    pub game_time: f64,
    pub ticks: u64,
    /// Capture timestamps, earliest first
    pub hider_capture_times: Vec<f64>,
    pub points_collected: u32,
    pub win: bool,
    pub outcome: RunOutcome,
}

impl RunResult {
    fn from_state(run: u32, seed: u64, state: &GameState) -> Self {
        Self {
            run,
            seed,
            game_time: state.elapsed_seconds(),
            ticks: state.time_ticks,
            hider_capture_times: state.capture_times(),
            points_collected: state.points_collected(),
            win: state.is_win(),
            outcome: state.outcome.unwrap_or(RunOutcome::Incomplete),
        }
    }
}

/// Every run's result plus the aggregates over them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessReport {
    pub results: Vec<RunResult>,
    /// Mean game time over completed runs; zero when none completed
    pub average_game_time: f64,
    /// Running total of game time after each run
    pub cumulative_game_times: Vec<f64>,
    /// Entry `k` averages the (k+1)-th capture time over the runs that had one
    pub mean_capture_times: Vec<f64>,
    pub wins: u32,
    pub incomplete: u32,
    /// The stop token fired before every run finished
    pub stopped: bool,
}

impl HarnessReport {
    pub fn from_results(results: Vec<RunResult>, stopped: bool) -> Self {
        let completed: Vec<&RunResult> = results
            .iter()
            .filter(|r| r.outcome != RunOutcome::Incomplete)
            .collect();
        let average_game_time = if completed.is_empty() {
            0.0
        } else {
            completed.iter().map(|r| r.game_time).sum::<f64>() / completed.len() as f64
        };

        let cumulative_game_times = results
            .iter()
            .scan(0.0, |total, r| {
                *total += r.game_time;
                Some(*total)
            })
            .collect();

        let most_captures = results
            .iter()
            .map(|r| r.hider_capture_times.len())
            .max()
            .unwrap_or(0);
        let mean_capture_times = (0..most_captures)
            .map(|k| {
                let nth: Vec<f64> = results
                    .iter()
                    .filter_map(|r| r.hider_capture_times.get(k).copied())
                    .collect();
                nth.iter().sum::<f64>() / nth.len() as f64
            })
            .collect();

        Self {
            wins: results.iter().filter(|r| r.win).count() as u32,
            incomplete: (results.len() - completed.len()) as u32,
            average_game_time,
            cumulative_game_times,
            mean_capture_times,
            results,
            stopped,
        }
    }
}

/// Sequential multi-run driver
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    stop: StopToken,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            stop: StopToken::new(),
        })
    }

    /// Handle that stops this harness from another thread
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn run(&self) -> Result<HarnessReport, SimError> {
        self.run_games(None::<fn(&RenderSnapshot)>)
    }

    /// Run every game, handing a snapshot to `observer` after each tick
    pub fn run_with_observer<F>(&self, observer: F) -> Result<HarnessReport, SimError>
    where
        F: FnMut(&RenderSnapshot),
    {
        self.run_games(Some(observer))
    }

    /// Snapshots are only built when someone observes them
    fn run_games<F>(&self, mut observer: Option<F>) -> Result<HarnessReport, SimError>
    where
        F: FnMut(&RenderSnapshot),
    {
        let base_seed = self.config.game.seed.unwrap_or_else(rand::random);
        let mut results = Vec::with_capacity(self.config.runs as usize);

        for run in 0..self.config.runs {
            if self.stop.is_stopped() {
                break;
            }
            let seed = derive_seed(base_seed, u64::from(run));
            let mut game = self.config.game.clone();
            game.seed = Some(seed);
            let mut state = GameState::new(game)?;

            while !state.is_over() && !self.stop.is_stopped() {
                tick(&mut state);
                if let Some(observer) = observer.as_mut() {
                    observer(&RenderSnapshot::capture(&state));
                }
            }
            if !state.is_over() {
                warn!("Run {} stopped at tick {}; discarded", run, state.time_ticks);
                break;
            }

            let result = RunResult::from_state(run, seed, &state);
            if result.outcome == RunOutcome::Incomplete {
                warn!("Run {} hit the tick ceiling at {:.2}s", run, result.game_time);
            }
            info!(
                "Run {}/{} finished in {:.2}s ({:?})",
                run + 1,
                self.config.runs,
                result.game_time,
                result.outcome
            );
            results.push(result);
        }

        let stopped = results.len() < self.config.runs as usize;
        let report = HarnessReport::from_results(results, stopped);
        info!(
            "Harness done: {} runs, average game time {:.2}s, {} wins",
            report.results.len(),
            report.average_game_time,
            report.wins
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObstacleLayout, SimConfig};

    fn small_batch(runs: u32) -> HarnessConfig {
        HarnessConfig {
            runs,
            game: SimConfig {
                num_hiders: 3,
                view_radius: 300.0,
                arena_width: 300.0,
                arena_height: 300.0,
                obstacles: ObstacleLayout::Fixed { obstacles: vec![] },
                max_ticks: Some(30_000),
                seed: Some(2024),
                ..Default::default()
            },
        }
    }

    fn result(game_time: f64, captures: &[f64], outcome: RunOutcome) -> RunResult {
        RunResult {
            run: 0,
            seed: 0,
            game_time,
            ticks: 0,
            hider_capture_times: captures.to_vec(),
            points_collected: 0,
            win: outcome != RunOutcome::Incomplete,
            outcome,
        }
    }

    #[test]
    fn test_runs_requested_count() {
        let report = Harness::new(small_batch(3)).unwrap().run().unwrap();
        assert_eq!(report.results.len(), 3);
        assert!(!report.stopped);
        for (i, r) in report.results.iter().enumerate() {
            assert_eq!(r.run, i as u32);
            assert!(r.game_time >= 0.0);
            assert!(r.hider_capture_times.len() <= 3);
            assert!(r.hider_capture_times.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(report.cumulative_game_times.len(), 3);
        assert!(report.cumulative_game_times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_same_base_seed_same_report() {
        let a = Harness::new(small_batch(2)).unwrap().run().unwrap();
        let b = Harness::new(small_batch(2)).unwrap().run().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.results[0].seed, a.results[1].seed);
    }

    #[test]
    fn test_zero_hiders_end_immediately() {
        let mut config = small_batch(2);
        config.game.num_hiders = 0;
        let report = Harness::new(config).unwrap().run().unwrap();
        for r in &report.results {
            assert_eq!(r.game_time, 0.0);
            assert!(r.hider_capture_times.is_empty());
            assert!(r.win);
        }
        assert_eq!(report.average_game_time, 0.0);
    }

    #[test]
    fn test_observer_sees_every_tick() {
        let harness = Harness::new(small_batch(1)).unwrap();
        let mut ticks = Vec::new();
        let report = harness
            .run_with_observer(|snap| ticks.push(snap.tick))
            .unwrap();
        assert_eq!(ticks.len() as u64, report.results[0].ticks);
        assert!(ticks.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_stop_discards_current_run() {
        let harness = Harness::new(small_batch(5)).unwrap();
        let stop = harness.stop_token();
        let report = harness
            .run_with_observer(|snap| {
                if snap.tick == 10 {
                    stop.stop();
                }
            })
            .unwrap();
        assert!(report.stopped);
        assert!(report.results.is_empty());
        assert!(report.cumulative_game_times.is_empty());
    }

    #[test]
    fn test_stop_between_runs_keeps_finished_ones() {
        let harness = Harness::new(small_batch(5)).unwrap();
        let stop = harness.stop_token();
        // The last snapshot of a run has every hider found or sits on the ceiling
        let report = harness
            .run_with_observer(|snap| {
                if snap.hiders.iter().all(|h| h.found) || snap.tick == 30_000 {
                    stop.stop();
                }
            })
            .unwrap();
        assert!(report.stopped);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].run, 0);
    }

    #[test]
    fn test_observer_does_not_change_results() {
        let plain = Harness::new(small_batch(2)).unwrap().run().unwrap();
        let mut frames = 0u64;
        let observed = Harness::new(small_batch(2))
            .unwrap()
            .run_with_observer(|_| frames += 1)
            .unwrap();
        assert_eq!(plain, observed);
        assert_eq!(frames, observed.results.iter().map(|r| r.ticks).sum::<u64>());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_batch(1);
        config.game.seeker_speed = 0.0;
        assert!(matches!(
            Harness::new(config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_aggregates() {
        let report = HarnessReport::from_results(
            vec![
                result(10.0, &[2.0, 6.0], RunOutcome::AllHidersFound),
                result(20.0, &[4.0], RunOutcome::AllPointsCollected),
                result(60.0, &[], RunOutcome::Incomplete),
            ],
            false,
        );
        assert_eq!(report.average_game_time, 15.0);
        assert_eq!(report.cumulative_game_times, vec![10.0, 30.0, 90.0]);
        assert_eq!(report.mean_capture_times, vec![3.0, 6.0]);
        assert_eq!(report.wins, 2);
        assert_eq!(report.incomplete, 1);
    }
}
