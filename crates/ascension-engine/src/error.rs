//! Failures of the engine binary.

/// Anything that stops the engine, from startup through the final
/// snapshot.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `ascension-config.yaml` could not be loaded.
    #[error("cannot load configuration: {source}")]
    Config {
        /// Cause.
        #[from]
        source: ascension_core::config::ConfigError,
    },

    /// The starting world could not be built.
    #[error("cannot build world: {source}")]
    World {
        /// Cause.
        #[from]
        source: ascension_world::WorldError,
    },

    /// Registering an actor failed.
    #[error("cannot register actor: {source}")]
    Agent {
        /// Cause.
        #[from]
        source: ascension_agents::AgentError,
    },

    /// A tick failed mid-run.
    #[error("simulation aborted: {source}")]
    Runner {
        /// Cause.
        #[from]
        source: ascension_core::runner::RunnerError,
    },

    /// Encoding the final snapshot failed.
    #[error("cannot encode snapshot: {source}")]
    Snapshot {
        /// Cause.
        #[from]
        source: ascension_core::snapshot::SnapshotError,
    },

    /// Writing the final snapshot failed.
    #[error("file access failed: {source}")]
    Io {
        /// Cause.
        #[from]
        source: std::io::Error,
    },

    /// Seed actors could not be spawned.
    #[error("cannot spawn seed actors: {message}")]
    Spawner {
        /// What was wrong with the request.
        message: String,
    },
}
