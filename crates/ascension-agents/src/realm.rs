//! Per-realm resource tables.
//!
//! Every realm has a fixed set of caps and rates: HP and MP ceilings, the
//! baseline lifespan guaranteed on entering the realm, the experience
//! steepness multiplier, and the breakthrough rate and failure penalty for
//! leaving it. The table has one named field per realm, so a realm without
//! an entry cannot be represented.

use ascension_types::Realm;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Caps and rates for one realm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealmStats {
    /// HP ceiling in this realm.
    pub max_hp: i64,
    /// MP ceiling in this realm.
    pub max_mp: i64,
    /// Lifespan floor (years) granted on entering this realm.
    pub lifespan_years: u32,
    /// Experience cost multiplier for levels in this realm.
    pub exp_multiplier: u64,
    /// Base probability of breaking out of this realm.
    pub breakthrough_rate: f64,
    /// Lifespan years lost when a breakthrough out of this realm fails.
    pub failure_penalty_years: u32,
}

/// The full realm table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealmTable {
    /// Qi Refinement.
    #[serde(default = "default_qi_refinement")]
    pub qi_refinement: RealmStats,
    /// Foundation Establishment.
    #[serde(default = "default_foundation_establishment")]
    pub foundation_establishment: RealmStats,
    /// Core Formation.
    #[serde(default = "default_core_formation")]
    pub core_formation: RealmStats,
    /// Nascent Soul.
    #[serde(default = "default_nascent_soul")]
    pub nascent_soul: RealmStats,
}

impl Default for RealmTable {
    fn default() -> Self {
        Self {
            qi_refinement: default_qi_refinement(),
            foundation_establishment: default_foundation_establishment(),
            core_formation: default_core_formation(),
            nascent_soul: default_nascent_soul(),
        }
    }
}

const fn default_qi_refinement() -> RealmStats {
    RealmStats {
        max_hp: 100,
        max_mp: 50,
        lifespan_years: 100,
        exp_multiplier: 1,
        breakthrough_rate: 0.6,
        failure_penalty_years: 5,
    }
}

const fn default_foundation_establishment() -> RealmStats {
    RealmStats {
        max_hp: 300,
        max_mp: 150,
        lifespan_years: 200,
        exp_multiplier: 3,
        breakthrough_rate: 0.4,
        failure_penalty_years: 10,
    }
}

const fn default_core_formation() -> RealmStats {
    RealmStats {
        max_hp: 800,
        max_mp: 400,
        lifespan_years: 400,
        exp_multiplier: 8,
        breakthrough_rate: 0.25,
        failure_penalty_years: 20,
    }
}

const fn default_nascent_soul() -> RealmStats {
    RealmStats {
        max_hp: 2000,
        max_mp: 1000,
        lifespan_years: 800,
        exp_multiplier: 20,
        breakthrough_rate: 0.0,
        failure_penalty_years: 40,
    }
}

impl RealmTable {
    /// Stats for a realm.
    pub const fn stats(&self, realm: Realm) -> &RealmStats {
        match realm {
            Realm::QiRefinement => &self.qi_refinement,
            Realm::FoundationEstablishment => &self.foundation_establishment,
            Realm::CoreFormation => &self.core_formation,
            Realm::NascentSoul => &self.nascent_soul,
        }
    }

    /// Check that the table is usable.
    ///
    /// Caps must be positive and non-decreasing along the realm ladder so a
    /// successful breakthrough never lowers a pool ceiling or the lifespan
    /// floor. Rates must be probabilities and multipliers at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidRealmTable`] naming the first bad realm.
    pub fn validate(&self) -> Result<(), AgentError> {
        let mut previous: Option<&RealmStats> = None;
        for realm in Realm::ALL {
            let stats = self.stats(realm);
            let invalid = |reason: &str| AgentError::InvalidRealmTable {
                realm,
                reason: reason.to_owned(),
            };

            if stats.max_hp <= 0 || stats.max_mp <= 0 {
                return Err(invalid("max_hp and max_mp must be positive"));
            }
            if stats.exp_multiplier == 0 {
                return Err(invalid("exp_multiplier must be at least 1"));
            }
            if !(0.0..=1.0).contains(&stats.breakthrough_rate) {
                return Err(invalid("breakthrough_rate must lie in [0, 1]"));
            }
            if let Some(prev) = previous {
                if stats.max_hp < prev.max_hp || stats.max_mp < prev.max_mp {
                    return Err(invalid("pool caps must not decrease from the previous realm"));
                }
                if stats.lifespan_years < prev.lifespan_years {
                    return Err(invalid("lifespan floor must not decrease from the previous realm"));
                }
            }
            previous = Some(stats);
        }
        Ok(())
    }
}
