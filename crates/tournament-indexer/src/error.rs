//! Error types for the reconstruction engine
//!
//! A skipped event is not an error: level-resolver mismatches surface as
//! `DispatchOutcome::Skipped`. Everything here is a fault that propagates
//! to the delivery side for redelivery or alerting.

use shared_types::Level;
use std::fmt;
use thiserror::Error;

use crate::domain::CalldataError;
use crate::ports::outbound::{ChainError, StoreError};

/// Entity family named in fault context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Tournament,
    Commitment,
    Match,
    Step,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tournament => "tournament",
            Self::Commitment => "commitment",
            Self::Match => "match",
            Self::Step => "step",
        };
        f.write_str(name)
    }
}

/// Reconstruction engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Entity already stored with a different payload
    #[error("Duplicate {entity} {id}: stored payload differs from replayed event")]
    DuplicateEntity { entity: EntityKind, id: String },

    /// Status change not reachable from the current status
    #[error("Invalid {entity} transition for {id}: {from} -> {to}")]
    InvalidTransition {
        entity: EntityKind,
        id: String,
        from: String,
        to: String,
    },

    /// Event references an entity the store does not hold
    #[error("Missing {entity} {id}")]
    MissingEntity { entity: EntityKind, id: String },

    /// Chain read failed; the whole event must be redelivered
    #[error("Chain unavailable: {reason}")]
    ChainUnavailable { reason: String },

    /// Transaction input could not be decoded for this event
    #[error("Malformed {event} payload: {source}")]
    MalformedPayload {
        event: &'static str,
        #[source]
        source: CalldataError,
    },

    /// Child tournament deeper than the configured bound
    #[error("Tournament depth exceeded: level {level}, max depth {max_depth}")]
    DepthExceeded { level: Level, max_depth: Level },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    /// Whether redelivering the same event may succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ChainUnavailable { .. } => true,
            Self::Storage(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DuplicateEntity { .. } => "duplicate_entity",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::MissingEntity { .. } => "missing_entity",
            Self::ChainUnavailable { .. } => "chain_unavailable",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::DepthExceeded { .. } => "depth_exceeded",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<ChainError> for EngineError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Unavailable(reason) => Self::ChainUnavailable { reason },
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
