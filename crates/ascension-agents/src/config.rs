//! Tunable rule parameters.
//!
//! These values correspond to the `realms`, `progression`, `affinities`,
//! `breakthrough`, and `actions` sections of `ascension-config.yaml`. The
//! [`Rulebook`] bundles every tunable so that callers (tick driver, tests)
//! can override defaults. Every field has a serde default, so a partially
//! specified section keeps the remaining defaults.

use std::collections::{BTreeMap, BTreeSet};

use ascension_types::{EssenceType, Root};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::realm::RealmTable;

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

/// Level thresholds within a realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Levels per realm; reaching the last one puts the actor in a
    /// bottleneck (default: 30).
    #[serde(default = "default_levels_per_realm")]
    pub levels_per_realm: u32,

    /// Base experience per level step (default: 200).
    ///
    /// Advancing from level `L` to `L + 1` costs
    /// `exp_per_level * exp_multiplier * L`.
    #[serde(default = "default_exp_per_level")]
    pub exp_per_level: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            levels_per_realm: default_levels_per_realm(),
            exp_per_level: default_exp_per_level(),
        }
    }
}

const fn default_levels_per_realm() -> u32 {
    30
}

const fn default_exp_per_level() -> u64 {
    200
}

// ---------------------------------------------------------------------------
// Affinities
// ---------------------------------------------------------------------------

/// Which essence types each spiritual root can draw on.
///
/// Roots absent from the table fall back to the essence of the same
/// element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityTable(BTreeMap<Root, BTreeSet<EssenceType>>);

impl Default for AffinityTable {
    fn default() -> Self {
        Self(
            Root::ALL
                .into_iter()
                .map(|root| (root, BTreeSet::from([native_essence(root)])))
                .collect(),
        )
    }
}

impl AffinityTable {
    /// Build a table from explicit entries.
    pub fn from_entries(entries: BTreeMap<Root, BTreeSet<EssenceType>>) -> Self {
        Self(entries)
    }

    /// Essence types compatible with a root.
    pub fn essences_for(&self, root: Root) -> BTreeSet<EssenceType> {
        self.0
            .get(&root)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([native_essence(root)]))
    }
}

/// The essence of the same element as a root.
pub const fn native_essence(root: Root) -> EssenceType {
    match root {
        Root::Metal => EssenceType::Metal,
        Root::Wood => EssenceType::Wood,
        Root::Water => EssenceType::Water,
        Root::Fire => EssenceType::Fire,
        Root::Earth => EssenceType::Earth,
    }
}

// ---------------------------------------------------------------------------
// Breakthrough
// ---------------------------------------------------------------------------

/// Per-root additions to the realm's base breakthrough rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakthroughConfig {
    /// Bonus probability per root (default: fire 0.05, earth 0.04,
    /// water 0.03, wood 0.02, metal 0.0).
    #[serde(default = "default_root_bonus")]
    pub root_bonus: BTreeMap<Root, f64>,
}

impl Default for BreakthroughConfig {
    fn default() -> Self {
        Self {
            root_bonus: default_root_bonus(),
        }
    }
}

fn default_root_bonus() -> BTreeMap<Root, f64> {
    BTreeMap::from([
        (Root::Metal, 0.0),
        (Root::Wood, 0.02),
        (Root::Water, 0.03),
        (Root::Fire, 0.05),
        (Root::Earth, 0.04),
    ])
}

impl BreakthroughConfig {
    /// Bonus for a root (0 when unlisted).
    pub fn bonus(&self, root: Root) -> f64 {
        self.root_bonus.get(&root).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Action tuning
// ---------------------------------------------------------------------------

/// Numeric knobs for the concrete actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTuning {
    /// Maximum tiles moved per axis per tick (default: 1).
    #[serde(default = "default_move_step")]
    pub move_step: i32,

    /// Experience per point of matching essence density per cultivation
    /// tick (default: 100).
    #[serde(default = "default_cultivate_exp_per_density")]
    pub cultivate_exp_per_density: u64,

    /// Per-tick chance that a hunt yields loot (default: 0.5).
    #[serde(default = "default_hunt_success_rate")]
    pub hunt_success_rate: f64,

    /// Per-tick chance that a harvest yields loot (default: 0.6).
    #[serde(default = "default_harvest_success_rate")]
    pub harvest_success_rate: f64,

    /// HP lost by the loser of a battle (default: 50).
    #[serde(default = "default_battle_hp_penalty")]
    pub battle_hp_penalty: u64,
}

impl Default for ActionTuning {
    fn default() -> Self {
        Self {
            move_step: default_move_step(),
            cultivate_exp_per_density: default_cultivate_exp_per_density(),
            hunt_success_rate: default_hunt_success_rate(),
            harvest_success_rate: default_harvest_success_rate(),
            battle_hp_penalty: default_battle_hp_penalty(),
        }
    }
}

const fn default_move_step() -> i32 {
    1
}

const fn default_cultivate_exp_per_density() -> u64 {
    100
}

const fn default_hunt_success_rate() -> f64 {
    0.5
}

const fn default_harvest_success_rate() -> f64 {
    0.6
}

const fn default_battle_hp_penalty() -> u64 {
    50
}

// ---------------------------------------------------------------------------
// Rulebook
// ---------------------------------------------------------------------------

/// Every rule parameter the action engine reads.
///
/// Built once from configuration at simulation start and passed by
/// reference into eligibility and effect computations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rulebook {
    /// Per-realm caps and rates.
    #[serde(default)]
    pub realms: RealmTable,
    /// Level thresholds.
    #[serde(default)]
    pub progression: ProgressionConfig,
    /// Root to essence compatibility.
    #[serde(default)]
    pub affinities: AffinityTable,
    /// Per-root breakthrough bonuses.
    #[serde(default)]
    pub breakthrough: BreakthroughConfig,
    /// Concrete action knobs.
    #[serde(default)]
    pub actions: ActionTuning,
}

impl Rulebook {
    /// Check that the rule parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidRealmTable`] for a bad realm table, or
    /// [`AgentError::InvalidRules`] for unusable progression or action
    /// parameters.
    pub fn validate(&self) -> Result<(), AgentError> {
        self.realms.validate()?;
        let invalid = |reason: &str| AgentError::InvalidRules {
            reason: reason.to_owned(),
        };
        if self.progression.levels_per_realm == 0 {
            return Err(invalid("levels_per_realm must be at least 1"));
        }
        if self.actions.move_step <= 0 {
            return Err(invalid("move_step must be positive"));
        }
        for rate in [self.actions.hunt_success_rate, self.actions.harvest_success_rate] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid("success rates must lie in [0, 1]"));
            }
        }
        if crate::progression::peak_threshold_overflows(self) {
            return Err(invalid("level thresholds overflow a 64-bit experience counter"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_affinity_is_one_to_one() {
        let table = AffinityTable::default();
        for root in Root::ALL {
            assert_eq!(table.essences_for(root), BTreeSet::from([native_essence(root)]));
        }
    }

    #[test]
    fn missing_root_falls_back_to_native_essence() {
        let table = AffinityTable::from_entries(BTreeMap::from([(
            Root::Wood,
            BTreeSet::from([EssenceType::Wood, EssenceType::Water]),
        )]));
        assert_eq!(table.essences_for(Root::Wood).len(), 2);
        assert_eq!(table.essences_for(Root::Fire), BTreeSet::from([EssenceType::Fire]));
    }

    #[test]
    fn default_rulebook_is_valid() {
        assert!(Rulebook::default().validate().is_ok());
    }

    #[test]
    fn zero_move_step_rejected() {
        let mut rules = Rulebook::default();
        rules.actions.move_step = 0;
        assert!(matches!(rules.validate(), Err(AgentError::InvalidRules { .. })));
    }

    #[test]
    fn unlisted_root_has_no_bonus() {
        let config = BreakthroughConfig {
            root_bonus: BTreeMap::new(),
        };
        assert!(config.bonus(Root::Fire).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_sections_deserialize_to_defaults() {
        let rules: Rulebook = serde_json::from_str("{}").unwrap();
        assert_eq!(rules.progression.levels_per_realm, 30);
        assert_eq!(rules.actions.cultivate_exp_per_density, 100);
    }
}
