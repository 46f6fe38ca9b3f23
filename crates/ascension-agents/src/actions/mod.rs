//! The action engine: the contract, every concrete action, and the
//! commitment lifecycle the tick driver runs them through.
//!
//! # Submodules
//!
//! - [`contract`] -- The [`Invocable`] trait, contexts, rejections, and step reports.
//! - [`duration`] -- Per-kind durations and the shared "is it over" rule.
//! - [`movement`] -- Single steps and travel to regions or actors.
//! - [`cultivation`] -- Cultivation and breakthrough.
//! - [`gathering`] -- Hunting and harvesting.
//! - [`market`] -- Selling at a market.
//! - [`combat`] -- Battles and the battle resolver seam.
//! - [`intent`] -- The [`Action`] union, intents, and commitments.

pub mod combat;
pub mod contract;
pub mod cultivation;
pub mod duration;
pub mod gathering;
pub mod intent;
pub mod market;
pub mod movement;

#[cfg(test)]
pub(crate) mod fixtures;

pub use combat::{Battle, BattleDecision, BattleResolver, PowerBattleResolver, battle_power};
pub use contract::{
    ActionContext, BattleReport, BreakthroughOutcome, ExecutionContext, IneligibleReason,
    Invocable, LootDrop, Rejection, Sale, StepReport, UnresolvedReference,
};
pub use cultivation::{Breakthrough, Cultivate};
pub use duration::{ActionDuration, duration_elapsed, duration_of};
pub use gathering::{Harvest, Hunt};
pub use intent::{Action, Commitment, Intent, NarrativeAction};
pub use market::Sell;
pub use movement::{Move, MoveToActor, MoveToRegion};
