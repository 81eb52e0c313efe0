/// Failures surfaced by the allocation core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The self-nomination resolution loop ran out of passes with roles still overfull.
    #[error("congestion loop exceeded {cap} passes; overfull roles: {overfull_roles:?}")]
    CongestionLoopExceeded { cap: usize, overfull_roles: Vec<usize> },
}

impl AllocError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        AllocError::InvalidConfiguration { reason: reason.into() }
    }
}

pub type AllocResult<T> = Result<T, AllocError>;
