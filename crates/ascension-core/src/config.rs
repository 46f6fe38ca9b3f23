//! Configuration loading and typed config structures for the Ascension
//! simulation.
//!
//! The canonical configuration lives in `ascension-config.yaml` at the
//! project root. Every section has serde defaults, so an empty file (or a
//! file that only overrides a few values) is valid. Loading validates the
//! rule sections before anything runs.

use std::path::Path;

use ascension_agents::config::{ActionTuning, AffinityTable, BreakthroughConfig, ProgressionConfig};
use ascension_agents::realm::RealmTable;
use ascension_agents::{AgentError, Rulebook};
use ascension_types::Realm;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A realm table entry is unusable (non-positive caps, shrinking caps
    /// between realms, a rate outside `[0, 1]`).
    #[error("invalid realm table entry for {realm:?}: {reason}")]
    InvalidRealmTable {
        /// The realm whose entry is wrong.
        realm: Realm,
        /// What is wrong with it.
        reason: String,
    },

    /// Some other value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<AgentError> for ConfigError {
    fn from(error: AgentError) -> Self {
        match error {
            AgentError::InvalidRealmTable { realm, reason } => {
                Self::InvalidRealmTable { realm, reason }
            }
            other => Self::Invalid {
                reason: other.to_string(),
            },
        }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `ascension-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, calendar, bounds).
    #[serde(default)]
    pub world: WorldConfig,

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

    /// Event log settings.
    #[serde(default)]
    pub events: EventsConfig,

    /// Heuristic decision settings.
    #[serde(default)]
    pub decisions: DecisionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error from [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error from [`validate`](Self::validate).
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for usable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRealmTable`] for a bad realm table and
    /// [`ConfigError::Invalid`] for anything else out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rulebook().validate()?;
        if self.events.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "events.capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// The rule sections bundled for the action engine.
    pub fn rulebook(&self) -> Rulebook {
        Rulebook {
            realms: self.realms,
            progression: self.progression.clone(),
            affinities: self.affinities.clone(),
            breakthrough: self.breakthrough.clone(),
            actions: self.actions.clone(),
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Calendar year of the first tick.
    #[serde(default = "default_start_year")]
    pub start_year: u64,

    /// Real-time milliseconds between ticks (0 runs flat out).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = until extinction).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Number of cultivators spawned at start.
    #[serde(default = "default_seed_actors")]
    pub seed_actors: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            start_year: default_start_year(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
            seed_actors: default_seed_actors(),
        }
    }
}

/// Event log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventsConfig {
    /// Events kept before the oldest are discarded.
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

/// Settings for the built-in heuristic decision source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecisionConfig {
    /// Items carried before a cultivator heads to market.
    #[serde(default = "default_sell_threshold")]
    pub sell_threshold: u64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            sell_threshold: default_sell_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "The Azure Continent".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_start_year() -> u64 {
    1
}

const fn default_tick_interval_ms() -> u64 {
    0
}

const fn default_max_ticks() -> u64 {
    1200
}

const fn default_seed_actors() -> u32 {
    8
}

const fn default_event_capacity() -> usize {
    1000
}

const fn default_sell_threshold() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::{EssenceType, Root};

    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.max_ticks, 1200);
        assert_eq!(config.progression.levels_per_realm, 30);
        assert_eq!(config.events.capacity, 1000);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = SimulationConfig::parse(include_str!("../../../ascension-config.yaml")).unwrap();
        let defaults = SimulationConfig::default();
        assert_eq!(config.world, defaults.world);
        assert_eq!(config.realms, defaults.realms);
        assert_eq!(config.progression, defaults.progression);
        assert_eq!(config.breakthrough, defaults.breakthrough);
        assert_eq!(config.actions, defaults.actions);
        assert_eq!(config.decisions, defaults.decisions);
        for root in Root::ALL {
            assert_eq!(
                config.affinities.essences_for(root),
                defaults.affinities.essences_for(root)
            );
        }
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r"
world:
  seed: 7
actions:
  hunt_success_rate: 0.9
decisions:
  sell_threshold: 2
affinities:
  Fire: [Fire, Earth]
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.start_year, 1);
        assert_eq!(config.actions.move_step, 1);
        assert_eq!(config.decisions.sell_threshold, 2);

        let rules = config.rulebook();
        assert!(
            rules
                .affinities
                .essences_for(Root::Fire)
                .contains(&EssenceType::Earth)
        );
        assert_eq!(rules.actions.cultivate_exp_per_density, 100);
    }

    #[test]
    fn shrinking_realm_caps_are_rejected() {
        let yaml = r"
realms:
  foundation_establishment:
    max_hp: 50
    max_mp: 150
    lifespan_years: 200
    exp_multiplier: 3
    breakthrough_rate: 0.4
    failure_penalty_years: 10
";
        let err = SimulationConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRealmTable { .. }), "{err}");
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let err = SimulationConfig::parse("actions:\n  harvest_success_rate: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_event_capacity_is_rejected() {
        let err = SimulationConfig::parse("events:\n  capacity: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = SimulationConfig::parse("world: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
