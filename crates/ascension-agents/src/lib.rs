//! Actor state, progression rules, and the action engine for the Ascension
//! simulation.
//!
//! This crate is the rule layer: everything that mutates a cultivator
//! without touching I/O. It sits between `ascension-types` /
//! `ascension-world` (data and map) and `ascension-core` (the tick driver).
//!
//! # Modules
//!
//! - [`actions`] -- The action contract, concrete actions, and commitments.
//! - [`actor`] -- Actors and the actor directory ([`Actor`], [`ActorDirectory`])
//! - [`affinity`] -- Matching spiritual roots against location essence
//! - [`config`] -- Rule parameters ([`Rulebook`])
//! - [`error`] -- Error types for actor operations ([`AgentError`])
//! - [`inventory`] -- Item holdings
//! - [`lifespan`] -- Age and life expectancy
//! - [`pools`] -- Bounded HP/MP counters ([`ResourcePool`])
//! - [`progression`] -- Experience, levels, bottlenecks, and breakthrough math
//! - [`realm`] -- Per-realm resource caps and rates ([`RealmTable`])

pub mod actions;
pub mod actor;
pub mod affinity;
pub mod config;
pub mod error;
pub mod inventory;
pub mod lifespan;
pub mod pools;
pub mod progression;
pub mod realm;

// Re-export primary types at crate root for convenience.
pub use actions::{
    Action, ActionContext, BattleResolver, Commitment, ExecutionContext, Intent, Invocable,
    NarrativeAction, PowerBattleResolver, Rejection, StepReport,
};
pub use actor::{Actor, ActorDirectory, DeathCause, DeathRecord};
pub use config::{ActionTuning, AffinityTable, BreakthroughConfig, ProgressionConfig, Rulebook};
pub use error::AgentError;
pub use inventory::Inventory;
pub use lifespan::Lifespan;
pub use pools::{PoolKind, ResourcePool};
pub use progression::{ProgressionLedger, experience_to_reach};
pub use realm::{RealmStats, RealmTable};
