//! Per-kind durations.
//!
//! Durations are fixed per action kind. A fixed-duration action started on
//! tick `s` with duration `n` finishes on tick `s + n - 1`: a 1-tick action
//! finishes the tick it starts, and a 10-tick action finishes on its tenth
//! active tick. Travel actions have no fixed duration and finish on
//! arrival.

use ascension_types::ActionKind;

/// How long an action of some kind runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionDuration {
    /// A fixed number of active ticks (at least 1).
    Fixed(u64),
    /// Until the actor reaches its target.
    UntilArrived,
}

/// The duration declared for each action kind.
pub const fn duration_of(kind: ActionKind) -> ActionDuration {
    match kind {
        ActionKind::Move | ActionKind::Breakthrough | ActionKind::Sell | ActionKind::Battle => {
            ActionDuration::Fixed(1)
        }
        ActionKind::Cultivate => ActionDuration::Fixed(10),
        ActionKind::Hunt | ActionKind::Harvest => ActionDuration::Fixed(6),
        ActionKind::MoveToRegion | ActionKind::MoveToActor => ActionDuration::UntilArrived,
    }
}

/// Whether a fixed-duration action started at `start_tick` is finished at
/// `current_tick`. Always `false` for arrival-based kinds.
pub const fn duration_elapsed(kind: ActionKind, start_tick: u64, current_tick: u64) -> bool {
    match duration_of(kind) {
        ActionDuration::Fixed(ticks) => {
            current_tick.saturating_sub(start_tick) >= ticks.saturating_sub(1)
        }
        ActionDuration::UntilArrived => false,
    }
}
