//! Test utilities
//!
//! Builders for chain events whose transaction input decodes to
//! consistent commitment and step data.

use shared_types::{Address, ChainEvent, EventKind, Hash, Level, Timestamp};

use crate::domain::{
    derive_entity_id, derive_match_id, keccak256, AdvanceMatchCall, ArbitrationResult,
    InnerTournamentWinner, JoinTournamentCall,
};

/// Block timestamp used by the builders.
pub const BASE_TIMESTAMP: Timestamp = 1_700_000_000;

pub fn address(byte: u8) -> Address {
    [byte; 20]
}

pub fn claim_root(byte: u8) -> Hash {
    [byte; 32]
}

/// Final machine state asserted by the claim rooted at `root`.
pub fn machine_hash_for(root: &Hash) -> Hash {
    derive_entity_id(&[&root[..], &b"machine"[..]])
}

/// Party submitting the claim rooted at `root`.
pub fn party_for(root: &Hash) -> Address {
    let hash = keccak256(root);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

pub fn left_of(root: &Hash) -> Hash {
    derive_entity_id(&[&root[..], &b"left"[..]])
}

pub fn right_of(root: &Hash) -> Hash {
    derive_entity_id(&[&root[..], &b"right"[..]])
}

pub fn event(contract: Address, level: Level, kind: EventKind) -> ChainEvent {
    ChainEvent {
        contract,
        level,
        kind,
        block_timestamp: BASE_TIMESTAMP,
        tx_sender: [0xEE; 20],
        tx_input: Vec::new(),
    }
}

pub fn tournament_created(contract: Address) -> ChainEvent {
    event(contract, 0, EventKind::TournamentCreated)
}

pub fn join_call(root: &Hash) -> JoinTournamentCall {
    JoinTournamentCall {
        final_state: machine_hash_for(root),
        proof: vec![keccak256(root), keccak256(&machine_hash_for(root))],
        left_node: left_of(root),
        right_node: right_of(root),
    }
}

pub fn commitment_joined(contract: Address, level: Level, root: Hash) -> ChainEvent {
    ChainEvent {
        tx_sender: party_for(&root),
        tx_input: join_call(&root).encode(),
        ..event(contract, level, EventKind::CommitmentJoined { root })
    }
}

pub fn match_created(contract: Address, level: Level, one: Hash, two: Hash) -> ChainEvent {
    event(
        contract,
        level,
        EventKind::MatchCreated {
            one,
            two,
            left_of_two: left_of(&two),
        },
    )
}

/// Bisection of `parent` played by the holder of `one`.
pub fn match_advanced(
    contract: Address,
    level: Level,
    one: Hash,
    two: Hash,
    parent: Hash,
) -> ChainEvent {
    let call = AdvanceMatchCall {
        one,
        two,
        left_node: left_of(&parent),
        right_node: right_of(&parent),
        new_left_node: left_of(&left_of(&parent)),
        new_right_node: right_of(&left_of(&parent)),
    };
    ChainEvent {
        tx_sender: party_for(&one),
        tx_input: call.encode(),
        ..event(
            contract,
            level,
            EventKind::MatchAdvanced {
                match_id: derive_match_id(&one, &two),
                parent,
                left: left_of(&parent),
            },
        )
    }
}

pub fn match_deleted(contract: Address, level: Level, one: Hash, two: Hash) -> ChainEvent {
    event(
        contract,
        level,
        EventKind::MatchDeleted {
            match_id: derive_match_id(&one, &two),
        },
    )
}

pub fn new_inner_tournament(
    contract: Address,
    level: Level,
    one: Hash,
    two: Hash,
    child: Address,
) -> ChainEvent {
    event(
        contract,
        level,
        EventKind::NewInnerTournament {
            match_id: derive_match_id(&one, &two),
            child,
        },
    )
}

/// Top-level result naming the claim rooted at `winner`.
pub fn arbitration_won_by(winner: &Hash) -> ArbitrationResult {
    ArbitrationResult {
        has_result: true,
        winning_claim_root: *winner,
        winning_machine_hash: machine_hash_for(winner),
    }
}

/// Inner result naming the claim rooted at `winner`.
pub fn inner_won_by(winner: &Hash) -> InnerTournamentWinner {
    InnerTournamentWinner {
        has_winner: true,
        contested_node: left_of(winner),
        winning_claim_root: *winner,
    }
}
