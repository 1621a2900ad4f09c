//! # Match Resolution
//!
//! Value objects returned by the chain reader and the rule that turns a
//! decisive result into commitment statuses.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, ZERO_HASH};

use super::entities::{Commitment, CommitmentStatus};

/// `innerTournamentWinner()` of a middle or bottom tournament.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InnerTournamentWinner {
    pub has_winner: bool,
    /// Node of the parent match the inner tournament was disputing.
    pub contested_node: Hash,
    pub winning_claim_root: Hash,
}

impl InnerTournamentWinner {
    pub fn undecided() -> Self {
        Self {
            has_winner: false,
            contested_node: ZERO_HASH,
            winning_claim_root: ZERO_HASH,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.has_winner.then(|| Verdict {
            winning_claim_root: self.winning_claim_root,
            winning_machine_hash: None,
            contested_node: Some(self.contested_node),
        })
    }
}

/// `arbitrationResult()` of a top tournament.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArbitrationResult {
    pub has_result: bool,
    pub winning_claim_root: Hash,
    pub winning_machine_hash: Hash,
}

impl ArbitrationResult {
    pub fn undecided() -> Self {
        Self {
            has_result: false,
            winning_claim_root: ZERO_HASH,
            winning_machine_hash: ZERO_HASH,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.has_result.then(|| Verdict {
            winning_claim_root: self.winning_claim_root,
            winning_machine_hash: Some(self.winning_machine_hash),
            contested_node: None,
        })
    }
}

/// A decisive outcome, recorded on the finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub winning_claim_root: Hash,
    /// Present for top-level arbitration.
    pub winning_machine_hash: Option<Hash>,
    /// Present for inner tournaments.
    pub contested_node: Option<Hash>,
}

impl Verdict {
    /// WON on an exact match of every value the verdict carries, LOST otherwise.
    pub fn outcome_for(&self, commitment: &Commitment) -> CommitmentStatus {
        let root_matches = commitment.claim_root == self.winning_claim_root;
        let machine_matches = self
            .winning_machine_hash
            .map_or(true, |hash| commitment.machine_hash == hash);

        if root_matches && machine_matches {
            CommitmentStatus::Won
        } else {
            CommitmentStatus::Lost
        }
    }
}
