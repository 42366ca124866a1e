#![forbid(unsafe_code)]

//! Tunables for the reactive engine.

use std::env;

/// Environment variable overriding [`ReactiveConfig::max_notify_depth`].
pub const MAX_NOTIFY_DEPTH_ENV: &str = "PUE_MAX_NOTIFY_DEPTH";

/// Configuration shared by every cell created from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactiveConfig {
    /// Maximum number of nested, value-changing writes to a single cell
    /// while its observers are still running. Exceeding it is fatal for
    /// `Cell::set` and an error for `Cell::try_set`.
    /// Default: 100.
    pub max_notify_depth: usize,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            max_notify_depth: 100,
        }
    }
}

impl ReactiveConfig {
    /// Set the re-entrancy limit. A limit of 0 is clamped to 1 so that a
    /// plain, non-nested write is always allowed.
    #[must_use]
    pub fn with_max_notify_depth(mut self, depth: usize) -> Self {
        self.max_notify_depth = depth.max(1);
        self
    }

    /// Defaults overridden by `PUE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `PUE_*`
    /// keys. Unparsable values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(val) = lookup(MAX_NOTIFY_DEPTH_ENV)
            && let Ok(depth) = val.trim().parse::<usize>()
        {
            config = config.with_max_notify_depth(depth);
        }
        config
    }
}
