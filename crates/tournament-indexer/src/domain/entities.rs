//! # Dispute Tree Entities
//!
//! The four persisted entities of the materialized view and their status
//! state machines.
//!
//! ```text
//! Commitment:  [WAITING] ──paired──→ [PLAYING] ──resolved──→ [WON | LOST]
//! Match:       [PLAYING] ──deleted──→ [FINISHED]
//! ```
//!
//! Every entity separates its *payload* (facts copied from the event that
//! created it) from *derived state* (status, links). Idempotent replays are
//! judged on payload alone.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Level, Timestamp, TOP_LEVEL};
use std::fmt;

use super::resolution::Verdict;

// =============================================================================
// STATUSES
// =============================================================================

/// Lifecycle of a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitmentStatus {
    /// Joined, not yet paired.
    Waiting,
    /// Paired into a match that has not concluded the dispute.
    Playing,
    /// Resolved in its favour.
    Won,
    /// Resolved against it.
    Lost,
}

impl CommitmentStatus {
    /// WON and LOST are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Whether `next` is reachable from `self`. Re-applying the current
    /// status is allowed so replays stay idempotent.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Waiting, Self::Playing) | (Self::Playing, Self::Won) | (Self::Playing, Self::Lost)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Playing => "PLAYING",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Playing,
    Finished,
}

impl MatchStatus {
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || (self == Self::Playing && next == Self::Finished)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "PLAYING",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TOURNAMENT
// =============================================================================

/// One level of the dispute hierarchy, keyed by contract address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Address,
    pub level: Level,
    pub created_at: Timestamp,
    /// Match whose sealing spawned this tournament (absent at the top).
    pub parent_match: Option<Hash>,
    /// Tournament owning `parent_match` (absent at the top).
    pub parent_tournament: Option<Address>,
}

impl Tournament {
    /// A root tournament deployed by the factory.
    pub fn root(id: Address, created_at: Timestamp) -> Self {
        Self {
            id,
            level: TOP_LEVEL,
            created_at,
            parent_match: None,
            parent_tournament: None,
        }
    }

    /// A tournament spawned by a sealed match of `parent_tournament`.
    pub fn inner(
        id: Address,
        level: Level,
        created_at: Timestamp,
        parent_match: Hash,
        parent_tournament: Address,
    ) -> Self {
        Self {
            id,
            level,
            created_at,
            parent_match: Some(parent_match),
            parent_tournament: Some(parent_tournament),
        }
    }
}

// =============================================================================
// COMMITMENT
// =============================================================================

/// A claim entered into a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// `derive_entity_id(claim_root, tournament)`.
    pub id: Hash,
    pub tournament: Address,
    pub claim_root: Hash,
    pub created_at: Timestamp,
    /// Sender of the joining transaction.
    pub party: Address,
    pub left_node: Hash,
    pub right_node: Hash,
    /// Sibling hashes proving `machine_hash` under the claim root.
    pub proof: Vec<Hash>,
    /// Final machine state asserted by the claim.
    pub machine_hash: Hash,
    pub status: CommitmentStatus,
    pub match_id: Option<Hash>,
}

impl Commitment {
    /// Payload equality, ignoring status and match link.
    pub fn same_payload(&self, other: &Self) -> bool {
        self.id == other.id
            && self.tournament == other.tournament
            && self.claim_root == other.claim_root
            && self.created_at == other.created_at
            && self.party == other.party
            && self.left_node == other.left_node
            && self.right_node == other.right_node
            && self.proof == other.proof
            && self.machine_hash == other.machine_hash
    }
}

// =============================================================================
// MATCH
// =============================================================================

/// A head-to-head pairing of two commitments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// `derive_match_id(one, two)`.
    pub id: Hash,
    pub tournament: Address,
    pub one: Hash,
    pub two: Hash,
    /// Left child of `two`'s root, the starting point of bisection.
    pub left_of_two: Hash,
    pub created_at: Timestamp,
    pub status: MatchStatus,
    /// Decisive result observed when the match finished, if any.
    pub resolution: Option<Verdict>,
}

impl Match {
    pub fn is_open(&self) -> bool {
        self.status == MatchStatus::Playing
    }

    /// Whether `claim_root` is one of the paired roots.
    pub fn involves(&self, claim_root: &Hash) -> bool {
        &self.one == claim_root || &self.two == claim_root
    }

    /// Payload equality, ignoring status and resolution.
    pub fn same_payload(&self, other: &Self) -> bool {
        self.id == other.id
            && self.tournament == other.tournament
            && self.one == other.one
            && self.two == other.two
            && self.left_of_two == other.left_of_two
            && self.created_at == other.created_at
    }
}

// =============================================================================
// STEP
// =============================================================================

/// One bisection round of a match. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// `derive_entity_id(match_id, parent, left)`.
    pub id: Hash,
    pub match_id: Hash,
    pub party: Address,
    /// Node being bisected.
    pub parent: Hash,
    pub left_node: Hash,
    pub right_node: Hash,
    pub new_left_node: Hash,
    pub new_right_node: Hash,
    pub created_at: Timestamp,
}
