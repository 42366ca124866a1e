use pue_core::ReactiveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("cannot convert {input:?} into {target}")]
    Conversion { input: String, target: &'static str },

    #[error("unsupported selector: {selector:?}")]
    InvalidSelector { selector: String },

    #[error(transparent)]
    Reactive(#[from] ReactiveError),
}

impl DomError {
    #[must_use]
    pub fn conversion(input: impl Into<String>, target: &'static str) -> Self {
        Self::Conversion {
            input: input.into(),
            target,
        }
    }

    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
        }
    }
}
