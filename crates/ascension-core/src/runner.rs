//! The bounded async simulation loop.
//!
//! [`run_simulation`] repeats [`run_tick`] until one of the stop
//! conditions in [`RunLimits`] holds, handing every tick summary to a
//! [`TickObserver`] and optionally pacing ticks in real time. It stops on:
//!
//! - the tick budget (`max_ticks`, 0 for none) being used up
//! - extinction, checked first, once no actor is left alive
//!
//! [`run_tick`]: crate::tick::run_tick

use tokio::time::{Duration, sleep};
use tracing::{info, warn};

use crate::decision::DecisionSource;
use crate::tick::{SimulationState, TickError, TickSummary, run_tick};

/// A run that could not continue.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick hit a genuine fault.
    #[error("run aborted by a failed tick: {source}")]
    Tick {
        /// What went wrong inside the tick.
        #[from]
        source: TickError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured tick budget was used up.
    MaxTicksReached,
    /// Every actor is dead.
    Extinction,
}

/// Stop conditions and pacing for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunLimits {
    /// Ticks to run before stopping (0 = no limit).
    pub max_ticks: u64,
    /// Real-time milliseconds to sleep between ticks.
    pub tick_interval_ms: u64,
}

impl RunLimits {
    /// Whether the run should stop after `ticks_run` ticks, the last of
    /// which produced `last`.
    pub const fn stop_reason(&self, last: &TickSummary, ticks_run: u64) -> Option<SimulationEndReason> {
        if last.actors_alive == 0 {
            Some(SimulationEndReason::Extinction)
        } else if self.max_ticks > 0 && ticks_run >= self.max_ticks {
            Some(SimulationEndReason::MaxTicksReached)
        } else {
            None
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub struct RunReport {
    /// Why the loop stopped.
    pub end_reason: SimulationEndReason,
    /// Summary of the final tick.
    pub last_summary: TickSummary,
    /// Ticks executed during this run.
    pub ticks_run: u64,
}

/// Sees every completed tick.
pub trait TickObserver: Send {
    /// Called once per tick, after the tick has fully resolved.
    fn observe(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// Ignores every tick.
pub struct NullObserver;

impl TickObserver for NullObserver {
    fn observe(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Drive the simulation until a stop condition holds.
///
/// At least one tick always runs.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] as soon as a tick fails; state mutated by
/// earlier ticks is kept.
pub async fn run_simulation(
    state: &mut SimulationState,
    decisions: &mut dyn DecisionSource,
    limits: RunLimits,
    observer: &mut dyn TickObserver,
) -> Result<RunReport, RunnerError> {
    info!(
        max_ticks = limits.max_ticks,
        tick_interval_ms = limits.tick_interval_ms,
        actors = state.actors.living_count(),
        start = %state.clock,
        "run starting"
    );

    let mut ticks_run: u64 = 0;
    loop {
        let summary = run_tick(state, decisions)?;
        ticks_run = ticks_run.saturating_add(1);
        observer.observe(&summary, state);

        if let Some(end_reason) = limits.stop_reason(&summary, ticks_run) {
            info!(tick = summary.tick, ?end_reason, ticks_run, "run stopping");
            return Ok(RunReport {
                end_reason,
                last_summary: summary,
                ticks_run,
            });
        }

        if limits.tick_interval_ms > 0 {
            sleep(Duration::from_millis(limits.tick_interval_ms)).await;
        }
    }
}

/// Write the closing lines of a run to the log.
pub fn log_run_report(report: &RunReport) {
    let last = &report.last_summary;
    info!(
        reason = ?report.end_reason,
        ticks_run = report.ticks_run,
        last_tick = last.tick,
        year = last.year,
        month = last.month,
        actors_alive = last.actors_alive,
        "run ended"
    );
    if report.end_reason == SimulationEndReason::Extinction {
        warn!(year = last.year, "no cultivator survived");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_agents::{Actor, Rulebook};
    use ascension_types::{Position, Root};
    use ascension_world::{ItemCatalog, WorldMap};

    use super::*;
    use crate::clock::WorldClock;
    use crate::decision::IdleDecisionSource;

    fn populated(count: usize) -> SimulationState {
        let world = WorldMap::new(4, 4, ItemCatalog::new()).unwrap();
        let mut state = SimulationState::new(world, Rulebook::default(), WorldClock::new(1), 1, 50);
        for n in 0..count {
            let actor = Actor::new(&format!("Hermit {n}"), Root::Earth, Position::new(0, 0), &state.rules);
            state.add_actor(actor).unwrap();
        }
        state
    }

    #[derive(Default)]
    struct Tally(Vec<u64>);

    impl TickObserver for Tally {
        fn observe(&mut self, summary: &TickSummary, _state: &SimulationState) {
            self.0.push(summary.tick);
        }
    }

    #[tokio::test]
    async fn tick_budget_ends_the_run() {
        let mut state = populated(2);
        let mut tally = Tally::default();
        let limits = RunLimits {
            max_ticks: 5,
            tick_interval_ms: 0,
        };
        let report = run_simulation(&mut state, &mut IdleDecisionSource, limits, &mut tally)
            .await
            .unwrap();

        assert_eq!(report.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(report.ticks_run, 5);
        assert_eq!(tally.0, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.last_summary.tick, 4);
        assert_eq!(state.clock.tick(), 5);
    }

    #[tokio::test]
    async fn extinction_ends_an_unbounded_run() {
        let mut state = populated(1);
        for id in state.actors.ids() {
            state.actors.get_mut(id).unwrap().lifespan.age_months = 100 * 12 - 3;
        }
        let report =
            run_simulation(&mut state, &mut IdleDecisionSource, RunLimits::default(), &mut NullObserver)
                .await
                .unwrap();

        assert_eq!(report.end_reason, SimulationEndReason::Extinction);
        assert_eq!(report.ticks_run, 3);
        assert_eq!(report.last_summary.deaths.len(), 1);
    }

    #[tokio::test]
    async fn an_empty_world_runs_one_tick() {
        let mut state = populated(0);
        let limits = RunLimits {
            max_ticks: 10,
            tick_interval_ms: 1,
        };
        let report = run_simulation(&mut state, &mut IdleDecisionSource, limits, &mut NullObserver)
            .await
            .unwrap();
        assert_eq!(report.end_reason, SimulationEndReason::Extinction);
        assert_eq!(report.ticks_run, 1);
    }
}
