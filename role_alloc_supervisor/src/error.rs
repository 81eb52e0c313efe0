use role_alloc_core::AllocError;

/// Driver-level failures.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Alloc(#[from] AllocError),

    #[error("trial {trial} failed: {source}")]
    Trial {
        trial: usize,
        #[source]
        source: AllocError,
    },

    #[error("failed to parse simulation config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("simulation needs at least one trial")]
    ZeroTrials,
}

pub type SimulationResult<T> = Result<T, SimulationError>;
