//! # Identity Deriver
//!
//! Deterministic entity identifiers. Identical inputs always produce the
//! same id, across call order and process restarts, which is what makes the
//! store's upserts idempotent.
//!
//! All ids are keccak-256 over the fixed-width concatenation of the parts,
//! so a match id equals the on-chain `keccak256(abi.encode(one, two))`.

use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash};

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the concatenation of `parts`.
pub fn derive_entity_id(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Match id for a pairing, in the order the event supplied the roots.
///
/// The protocol emits pairings in canonical order; sorting here would
/// diverge from the on-chain id.
pub fn derive_match_id(root_a: &Hash, root_b: &Hash) -> Hash {
    derive_entity_id(&[root_a, root_b])
}

/// Commitment id: claim root scoped to its owning tournament.
pub fn commitment_id(claim_root: &Hash, tournament: &Address) -> Hash {
    derive_entity_id(&[claim_root, tournament])
}

/// Step id: one bisection of `parent` into `left` within a match.
pub fn step_id(match_id: &Hash, parent: &Hash, left: &Hash) -> Hash {
    derive_entity_id(&[match_id, parent, left])
}
