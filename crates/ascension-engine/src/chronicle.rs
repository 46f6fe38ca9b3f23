//! Tick observer that writes the world's notable events to the log.

use ascension_core::runner::TickObserver;
use ascension_core::tick::{SimulationState, TickSummary};
use tracing::info;

/// Logs every major or story event of each tick, and a yearly census.
#[derive(Debug, Default)]
pub struct Chronicle {
    chronicled: u64,
}

impl Chronicle {
    /// A chronicle with nothing written yet.
    pub const fn new() -> Self {
        Self { chronicled: 0 }
    }

    /// Events written so far.
    pub const fn chronicled(&self) -> u64 {
        self.chronicled
    }
}

impl TickObserver for Chronicle {
    fn observe(&mut self, summary: &TickSummary, state: &SimulationState) {
        for event in state.events.at_tick(summary.tick) {
            if event.is_major || event.is_story {
                info!(
                    year = summary.year,
                    month = summary.month,
                    story = event.is_story,
                    "{}",
                    event.text
                );
                self.chronicled = self.chronicled.saturating_add(1);
            }
        }
        if summary.month == 12 {
            info!(
                year = summary.year,
                alive = summary.actors_alive,
                committed = state.commitments.len(),
                "year ended"
            );
        }
    }
}
