use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReactiveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    #[error("cell notification depth exceeded: {depth} nested writes (limit {limit})")]
    NotifyDepthExceeded { depth: usize, limit: usize },
}

impl ReactiveError {
    /// Whether the error came from the re-entrancy guard.
    #[must_use]
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, Self::NotifyDepthExceeded { .. })
    }
}
