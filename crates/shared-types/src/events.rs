//! # Chain Events
//!
//! The per-log record consumed by the reconstruction engine. Transport,
//! ABI log decoding and retries belong to the delivery side; by the time a
//! `ChainEvent` exists its indexed arguments are already typed.
//!
//! ## Event Set
//!
//! | Kind | Emitted by | Levels |
//! |------|------------|--------|
//! | `TournamentCreated` | factory | top |
//! | `CommitmentJoined` | tournament | all |
//! | `MatchCreated` | tournament | all |
//! | `MatchAdvanced` | tournament | all |
//! | `MatchDeleted` | tournament | all |
//! | `NewInnerTournament` | parent tournament | all but the deepest |

use serde::{Deserialize, Serialize};

use crate::entities::{Address, Hash, Level, Timestamp, TOP_LEVEL};

/// A single observed log together with its block and transaction context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// Address of the emitting contract (the tournament for all kinds
    /// except `TournamentCreated`, where it is the created tournament).
    pub contract: Address,
    /// Level of the handler set that observed the log.
    pub level: Level,
    /// Kind-specific arguments.
    pub kind: EventKind,
    /// Timestamp of the including block.
    pub block_timestamp: Timestamp,
    /// Sender of the including transaction.
    pub tx_sender: Address,
    /// Raw input of the including transaction.
    pub tx_input: Vec<u8>,
}

impl ChainEvent {
    /// Whether this event was observed by the top-level handler set.
    pub fn is_top_level(&self) -> bool {
        self.level == TOP_LEVEL
    }
}

/// Closed set of log kinds the engine understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A root tournament was deployed by the factory.
    TournamentCreated,
    /// A claim was entered into the tournament.
    CommitmentJoined { root: Hash },
    /// Two claims were paired into a match.
    MatchCreated {
        one: Hash,
        two: Hash,
        left_of_two: Hash,
    },
    /// A bisection step was played in a match.
    MatchAdvanced {
        match_id: Hash,
        parent: Hash,
        left: Hash,
    },
    /// A match was removed from the tournament.
    MatchDeleted { match_id: Hash },
    /// A sealed match spawned a tournament one level deeper.
    NewInnerTournament { match_id: Hash, child: Address },
}

impl EventKind {
    /// Stable name for logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TournamentCreated => "tournament_created",
            Self::CommitmentJoined { .. } => "commitment_joined",
            Self::MatchCreated { .. } => "match_created",
            Self::MatchAdvanced { .. } => "match_advanced",
            Self::MatchDeleted { .. } => "match_deleted",
            Self::NewInnerTournament { .. } => "new_inner_tournament",
        }
    }
}
