//! The progression ledger: experience, level, realm, and bottleneck state.
//!
//! Experience is tracked per realm. Level and bottleneck are never stored
//! independently of experience: after every gain they are re-derived from
//! the total against the realm's thresholds. The cost of advancing from
//! level `L` to `L + 1` is `exp_per_level * exp_multiplier * L`, so the
//! total needed to reach level `L` is
//!
//! ```text
//! exp_per_level * exp_multiplier * L * (L - 1) / 2
//! ```
//!
//! Reaching `levels_per_realm` in any realm but the last puts the ledger in
//! a bottleneck: further experience is ignored until a breakthrough
//! succeeds. In the last realm the same level is the peak, and experience
//! stops counting there too.

use ascension_types::{Realm, Root};
use serde::{Deserialize, Serialize};

use crate::config::Rulebook;

/// An actor's cultivation progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionLedger {
    realm: Realm,
    level: u32,
    experience: u64,
    is_in_bottleneck: bool,
}

/// Total experience needed to reach `level` in `realm`.
///
/// Returns `None` for level 0 or on overflow.
pub fn experience_to_reach(level: u32, realm: Realm, rules: &Rulebook) -> Option<u64> {
    let l = u64::from(level);
    let triangle = l.checked_mul(l.checked_sub(1)?)?.checked_div(2)?;
    rules
        .progression
        .exp_per_level
        .checked_mul(rules.realms.stats(realm).exp_multiplier)?
        .checked_mul(triangle)
}

/// Whether the top level of any realm has an unrepresentable threshold.
pub(crate) fn peak_threshold_overflows(rules: &Rulebook) -> bool {
    Realm::ALL
        .into_iter()
        .any(|realm| experience_to_reach(rules.progression.levels_per_realm, realm, rules).is_none())
}

/// Derive `(level, is_in_bottleneck)` from an experience total.
fn derive(realm: Realm, experience: u64, rules: &Rulebook) -> (u32, bool) {
    let cap = rules.progression.levels_per_realm.max(1);
    let mut level = 1;
    for candidate in 2..=cap {
        match experience_to_reach(candidate, realm, rules) {
            Some(threshold) if experience >= threshold => level = candidate,
            _ => break,
        }
    }
    (level, level >= cap && !realm.is_peak())
}

impl ProgressionLedger {
    /// A fresh ledger at level 1 of `realm`.
    pub fn new(realm: Realm, rules: &Rulebook) -> Self {
        Self::restore(realm, 0, rules)
    }

    /// Rebuild a ledger from a stored realm and experience total.
    ///
    /// Level and bottleneck are re-derived, never trusted from storage.
    pub fn restore(realm: Realm, experience: u64, rules: &Rulebook) -> Self {
        let (level, is_in_bottleneck) = derive(realm, experience, rules);
        Self {
            realm,
            level,
            experience,
            is_in_bottleneck,
        }
    }

    /// A ledger holding exactly the experience needed for `level`.
    ///
    /// The level is clamped to `1..=levels_per_realm`.
    ///
    /// # Panics
    ///
    /// Panics if the threshold overflows; a validated [`Rulebook`] never
    /// allows that.
    pub fn at_level(realm: Realm, level: u32, rules: &Rulebook) -> Self {
        let level = level.clamp(1, rules.progression.levels_per_realm.max(1));
        let experience = experience_to_reach(level, realm, rules);
        assert!(
            experience.is_some(),
            "experience threshold for level {level} of {realm:?} overflows"
        );
        Self::restore(realm, experience.unwrap_or(u64::MAX), rules)
    }

    /// Current realm.
    pub const fn realm(&self) -> Realm {
        self.realm
    }

    /// Current level within the realm (1-based).
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated in the current realm.
    pub const fn experience(&self) -> u64 {
        self.experience
    }

    /// Whether experience gain is blocked pending a breakthrough.
    pub const fn is_in_bottleneck(&self) -> bool {
        self.is_in_bottleneck
    }

    /// Whether the ledger sits at the top level of the last realm.
    pub fn is_at_peak(&self, rules: &Rulebook) -> bool {
        self.realm.is_peak() && self.level >= rules.progression.levels_per_realm
    }

    /// Experience still needed to reach the next level, or `None` at the
    /// level cap.
    pub fn experience_to_next_level(&self, rules: &Rulebook) -> Option<u64> {
        if self.level >= rules.progression.levels_per_realm {
            return None;
        }
        let next = experience_to_reach(self.level.checked_add(1)?, self.realm, rules)?;
        Some(next.saturating_sub(self.experience))
    }

    /// Add experience and re-derive level and bottleneck.
    ///
    /// A no-op while in a bottleneck or at the peak. Returns the amount
    /// actually credited.
    ///
    /// # Panics
    ///
    /// Panics if the re-derived level is lower than before, which would
    /// mean the threshold table is not monotonic.
    pub fn add_experience(&mut self, amount: u64, rules: &Rulebook) -> u64 {
        if self.is_in_bottleneck || self.is_at_peak(rules) {
            return 0;
        }
        self.experience = self.experience.saturating_add(amount);
        let (level, is_in_bottleneck) = derive(self.realm, self.experience, rules);
        assert!(
            level >= self.level,
            "ledger level regressed from {} to {level} after gaining experience",
            self.level
        );
        self.level = level;
        self.is_in_bottleneck = is_in_bottleneck;
        amount
    }

    /// Probability that a breakthrough out of the current realm succeeds.
    ///
    /// The realm's base rate (steeper realms have lower rates) plus the
    /// root's bonus, clamped to `[0, 1]`. A NaN from bad configuration reads
    /// as 0.
    pub fn breakthrough_success_rate(&self, root: Root, rules: &Rulebook) -> f64 {
        let base = rules.realms.stats(self.realm).breakthrough_rate;
        let rate = base + rules.breakthrough.bonus(root);
        if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
    }

    /// Lifespan years lost if a breakthrough out of the current realm fails.
    pub fn breakthrough_failure_penalty(&self, rules: &Rulebook) -> u32 {
        rules.realms.stats(self.realm).failure_penalty_years
    }

    /// Enter the next realm after a successful breakthrough.
    ///
    /// Experience resets to 0 at level 1 and the bottleneck clears. Returns
    /// the new realm, or `None` (leaving the ledger untouched) at the last
    /// realm.
    pub fn complete_breakthrough(&mut self) -> Option<Realm> {
        let next = self.realm.next()?;
        self.realm = next;
        self.level = 1;
        self.experience = 0;
        self.is_in_bottleneck = false;
        Some(next)
    }
}
