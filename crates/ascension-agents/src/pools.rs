//! Bounded HP and MP counters.
//!
//! A [`ResourcePool`] never holds more than its cap. Recovery clamps at the
//! cap; mana reduction floors at zero; health reduction may go below zero,
//! which is how an actor becomes eligible for death. Caps only ever rise,
//! and only when a breakthrough re-derives them from the realm table.
//!
//! Breaking these rules is a logic bug, not a game outcome, so the checks
//! are assertions rather than clamps. Pools decoded from storage are checked
//! too, and a corrupt one fails to decode.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Which resource a pool tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolKind {
    /// Hit points. Going below zero signals death eligibility.
    Health,
    /// Mana. Floors at zero.
    Mana,
}

/// A bounded resource counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredPool")]
pub struct ResourcePool {
    kind: PoolKind,
    current: i64,
    max: i64,
}

/// A pool as written to storage, before its bounds are checked.
#[derive(Deserialize)]
struct StoredPool {
    kind: PoolKind,
    current: i64,
    max: i64,
}

impl TryFrom<StoredPool> for ResourcePool {
    type Error = AgentError;

    fn try_from(stored: StoredPool) -> Result<Self, Self::Error> {
        let StoredPool { kind, current, max } = stored;
        if max < 0 || current > max {
            return Err(AgentError::CorruptPool { kind, current, max });
        }
        Ok(Self { kind, current, max })
    }
}

impl ResourcePool {
    /// A full pool with the given cap.
    pub fn full(kind: PoolKind, max: i64) -> Self {
        Self::from_parts(kind, max, max)
    }

    /// Rebuild a pool from stored values.
    ///
    /// # Panics
    ///
    /// Panics if `current > max` or `max < 0`: a stored pool above its cap
    /// is corrupt data.
    pub fn from_parts(kind: PoolKind, current: i64, max: i64) -> Self {
        assert!(max >= 0, "{kind:?} pool cap {max} is negative");
        assert!(current <= max, "{kind:?} pool current {current} exceeds cap {max}");
        Self { kind, current, max }
    }

    /// Which resource this pool tracks.
    pub const fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Current value.
    pub const fn current(&self) -> i64 {
        self.current
    }

    /// Cap.
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Whether the pool is at its cap.
    pub const fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Restore up to `amount`, clamped at the cap.
    pub fn recover(&mut self, amount: u64) {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Spend or lose `amount`.
    ///
    /// Mana floors at zero. Health may drop below zero; the return value is
    /// `true` exactly when a health pool ends below zero, meaning the owner
    /// is eligible for death. Mana pools always return `false`.
    pub fn reduce(&mut self, amount: u64) -> bool {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        self.current = self.current.saturating_sub(amount);
        match self.kind {
            PoolKind::Mana => {
                self.current = self.current.max(0);
                false
            }
            PoolKind::Health => self.current < 0,
        }
    }

    /// Raise the cap to `new_max` and add the increase to `current`.
    ///
    /// # Panics
    ///
    /// Panics if `new_max` is below the current cap. Caps never shrink.
    pub fn raise_max(&mut self, new_max: i64) {
        assert!(
            new_max >= self.max,
            "{:?} pool cap may not shrink from {} to {new_max}",
            self.kind,
            self.max
        );
        let delta = new_max.saturating_sub(self.max);
        self.max = new_max;
        self.current = self.current.saturating_add(delta).min(self.max);
    }
}
