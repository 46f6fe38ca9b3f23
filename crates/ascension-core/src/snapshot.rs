//! Snapshot and restore of the resumable simulation state.
//!
//! A snapshot holds what is needed to pick a run back up: the clock, the
//! random seed, and for every actor its record plus its commitment (action
//! and start tick, or none). The world map and rules are not included; they
//! come from configuration. Snapshots serialize to JSON.
//!
//! Random draws are keyed on seed and tick, so a restored run repeats the
//! draws of the run it was captured from.
//!
//! Derived ledger fields are never trusted from storage. Restoring
//! recomputes level and bottleneck from the stored realm and experience.
//! Resource pools above their cap fail to decode.

use ascension_agents::{Actor, ActorDirectory, AgentError, Commitment, ProgressionLedger};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::WorldClock;
use crate::tick::SimulationState;

/// Errors that can occur when saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot could not be encoded or decoded.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot's actors could not be registered.
    #[error("snapshot actor error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// One actor and its commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    /// Full actor state.
    pub actor: Actor,
    /// The active commitment, or `None` if uncommitted.
    pub commitment: Option<Commitment>,
}

/// Resumable simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// The tick about to run.
    pub tick: u64,
    /// Calendar year of tick 0.
    pub start_year: u64,
    /// Seed the run's random draws are keyed on.
    pub seed: u64,
    /// Every actor, living or dead, in ID order.
    pub actors: Vec<ActorRecord>,
}

impl SimulationSnapshot {
    /// Capture the current state.
    pub fn capture(state: &SimulationState) -> Self {
        let actors = state
            .actors
            .iter()
            .map(|actor| ActorRecord {
                actor: actor.clone(),
                commitment: state.commitments.get(&actor.id).cloned(),
            })
            .collect();
        Self {
            tick: state.clock.tick(),
            start_year: state.clock.start_year(),
            seed: state.seed(),
            actors,
        }
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] for malformed input, including a
    /// resource pool stored above its cap.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the clock, seed, actors, and commitments of `state` with this
    /// snapshot's contents.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Agent`] if two actors share a name. `state`
    /// is left untouched in that case.
    pub fn restore(self, state: &mut SimulationState) -> Result<(), SnapshotError> {
        let mut actors = ActorDirectory::new();
        let mut commitments = std::collections::BTreeMap::new();
        for ActorRecord { mut actor, commitment } in self.actors {
            actor.ledger = rederive(&actor, state);
            if let Some(commitment) = commitment
                && actor.is_alive()
            {
                commitments.insert(actor.id, commitment);
            }
            actors.insert(actor)?;
        }

        info!(
            tick = self.tick,
            actors = actors.len(),
            commitments = commitments.len(),
            "snapshot restored"
        );
        state.clock = WorldClock::from_parts(self.tick, self.start_year);
        state.reseed(self.seed);
        state.actors = actors;
        state.commitments = commitments;
        Ok(())
    }
}

fn rederive(actor: &Actor, state: &SimulationState) -> ProgressionLedger {
    ProgressionLedger::restore(actor.ledger.realm(), actor.ledger.experience(), &state.rules)
}
