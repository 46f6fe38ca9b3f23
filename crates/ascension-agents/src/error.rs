//! Error types for the ascension-agents crate.
//!
//! Only genuine faults travel through [`AgentError`]: missing actors on
//! explicit lookups, inventory misuse, arithmetic overflow, and bad rule
//! tables. Ineligible commitments are reported as
//! [`Rejection`](crate::actions::Rejection) values and lost rolls as plain
//! outcome data; neither uses this type.

use ascension_types::{AgentId, ItemId, Realm};

use crate::pools::PoolKind;

/// Errors that can occur during actor state operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to remove more of an item than the actor holds.
    #[error("insufficient item {item}: wanted {requested} but only have {available}")]
    InsufficientItem {
        /// The item being removed.
        item: ItemId,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity the actor actually holds.
        available: u32,
    },

    /// An arithmetic overflow occurred during a rule computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Actor with the given ID was not found in the directory.
    #[error("actor not found: {0}")]
    AgentNotFound(AgentId),

    /// Actor name already exists in the directory.
    #[error("duplicate actor name: {0}")]
    DuplicateName(String),

    /// A realm table entry is unusable.
    #[error("invalid realm table entry for {realm:?}: {reason}")]
    InvalidRealmTable {
        /// The realm whose entry is wrong.
        realm: Realm,
        /// What is wrong with it.
        reason: String,
    },

    /// A stored resource pool is outside its bounds.
    #[error("corrupt {kind:?} pool: current {current} exceeds its cap {max} or the cap is negative")]
    CorruptPool {
        /// Which pool.
        kind: PoolKind,
        /// Stored current value.
        current: i64,
        /// Stored cap.
        max: i64,
    },

    /// A rule parameter outside the realm table is unusable.
    #[error("invalid rules: {reason}")]
    InvalidRules {
        /// What is wrong.
        reason: String,
    },
}

impl AgentError {
    /// Shorthand for an [`AgentError::ArithmeticOverflow`].
    pub(crate) fn overflow(context: &str) -> Self {
        Self::ArithmeticOverflow {
            context: context.to_owned(),
        }
    }
}
