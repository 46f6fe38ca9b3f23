//! Engine binary for the Ascension simulation.
//!
//! This is the main entry point that wires together the tick cycle,
//! starting world, actor spawner, and heuristic decision source. It loads
//! configuration, initializes all subsystems, and runs the simulation loop
//! until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ascension-config.yaml` (or the path in
//!    `ASCENSION_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the world clock
//! 4. Create the starting world map
//! 5. Spawn seed actors across the map
//! 6. Assemble the simulation state
//! 7. Run the simulation loop
//! 8. Log the result and write a final snapshot if `ASCENSION_SNAPSHOT` is
//!    set

mod chronicle;
mod error;
mod spawner;

use std::path::{Path, PathBuf};

use ascension_core::clock::WorldClock;
use ascension_core::config::{LoggingConfig, SimulationConfig};
use ascension_core::decision::HeuristicDecisionSource;
use ascension_core::runner::{self, RunLimits};
use ascension_core::snapshot::SimulationSnapshot;
use ascension_core::tick::SimulationState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chronicle::Chronicle;
use crate::error::EngineError;
use crate::spawner::SpawnerConfig;

const DEFAULT_CONFIG_PATH: &str = "ascension-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::var_os("ASCENSION_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        path = %config_path.display(),
        world_name = config.world.name,
        seed = config.world.seed,
        max_ticks = config.world.max_ticks,
        tick_interval_ms = config.world.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Create world clock.
    let clock = WorldClock::new(config.world.start_year);
    info!(start = %clock, "World clock initialized");

    // 4. Create starting world map.
    let (world, region_ids) = ascension_world::create_starting_world()?;
    info!(
        region_count = world.region_count(),
        market = %region_ids.jade_city,
        "Starting world created"
    );

    // 5. Spawn seed actors.
    let spawner_config = load_spawner_config(&config_path)?;
    let rules = config.rulebook();
    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let actors = spawner::spawn_seed_actors(
        &spawner_config,
        config.world.seed_actors,
        &world,
        &rules,
        &mut rng,
    )?;
    info!(actors_spawned = actors.len(), "Seed actors spawned");

    // 6. Assemble simulation state.
    let mut state =
        SimulationState::new(world, rules, clock, config.world.seed, config.events.capacity);
    for actor in actors {
        state.add_actor(actor)?;
    }
    let mut decisions = HeuristicDecisionSource::new(config.decisions.sell_threshold);
    let mut chronicle = Chronicle::new();
    info!("Simulation state assembled, entering tick loop");

    // 7. Run the simulation.
    let limits = RunLimits {
        max_ticks: config.world.max_ticks,
        tick_interval_ms: config.world.tick_interval_ms,
    };
    let report = runner::run_simulation(&mut state, &mut decisions, limits, &mut chronicle)
        .await
        .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_run_report(&report);
    if let Some(path) = std::env::var_os("ASCENSION_SNAPSHOT") {
        write_snapshot(&state, Path::new(&path))?;
    }

    info!(
        end_reason = ?report.end_reason,
        ticks_run = report.ticks_run,
        chronicled = chronicle.chronicled(),
        "ascension-engine shutdown complete"
    );

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the main simulation configuration.
///
/// A missing file means defaults.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

/// Load spawner configuration from the `spawner` section of the config
/// file. A missing file or section means defaults.
fn load_spawner_config(path: &Path) -> Result<SpawnerConfig, EngineError> {
    if !path.exists() {
        return Ok(SpawnerConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let raw: serde_yml::Value = serde_yml::from_str(&contents).map_err(|e| EngineError::Spawner {
        message: format!("failed to parse config YAML: {e}"),
    })?;
    raw.get("spawner").map_or_else(
        || Ok(SpawnerConfig::default()),
        |section| {
            serde_yml::from_value(section.clone()).map_err(|e| EngineError::Spawner {
                message: format!("failed to parse spawner config: {e}"),
            })
        },
    )
}

fn write_snapshot(state: &SimulationState, path: &Path) -> Result<(), EngineError> {
    let json = SimulationSnapshot::capture(state).to_json()?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Final snapshot written");
    Ok(())
}
