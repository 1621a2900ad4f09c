//! Indexer configuration

use shared_types::Level;

use crate::error::{EngineError, EngineResult};

/// Environment variable bounding tournament depth.
pub const MAX_DEPTH_ENV: &str = "DT_MAX_DEPTH";

/// Engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Number of levels allowed below and including the top. `None` leaves
    /// the hierarchy unbounded.
    pub max_depth: Option<Level>,
}

impl IndexerConfig {
    /// Bounded to `max_depth` levels.
    pub fn with_max_depth(max_depth: Level) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Load from environment variables. Unparsable values fall back to the
    /// default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_depth = lookup(MAX_DEPTH_ENV).and_then(|raw| match raw.trim().parse::<Level>() {
            Ok(depth) => Some(depth),
            Err(err) => {
                tracing::warn!(value = %raw, error = %err, "Ignoring invalid {}", MAX_DEPTH_ENV);
                None
            }
        });
        Self { max_depth }
    }

    /// Fails when a tournament at `level` would exceed the bound.
    pub fn check_depth(&self, level: Level) -> EngineResult<()> {
        match self.max_depth {
            Some(max_depth) if level >= max_depth => {
                Err(EngineError::DepthExceeded { level, max_depth })
            }
            _ => Ok(()),
        }
    }
}
