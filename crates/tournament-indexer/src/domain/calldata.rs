//! # Transaction Payload Decoding
//!
//! Logs carry only the indexed identifiers. The remaining commitment and
//! step attributes are recovered from the input of the transaction that
//! emitted the log.
//!
//! ## Layout
//!
//! ```text
//! [selector: 4][head: 32 × n][tail: dynamic data]
//! ```
//!
//! Offsets in the head are measured from the first byte after the selector.

use shared_types::Hash;
use thiserror::Error;

use super::identity::{derive_match_id, keccak256};

/// Size of one ABI word.
pub const WORD: usize = 32;

pub const JOIN_TOURNAMENT_SIGNATURE: &str = "joinTournament(bytes32,bytes32[],bytes32,bytes32)";

pub const ADVANCE_MATCH_SIGNATURE: &str =
    "advanceMatch((bytes32,bytes32),bytes32,bytes32,bytes32,bytes32)";

/// Errors decoding a transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalldataError {
    #[error("Calldata too short: need {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("Selector mismatch: expected {expected:02x?}, got {actual:02x?}")]
    SelectorMismatch { expected: [u8; 4], actual: [u8; 4] },

    #[error("Offset or length word out of range: {0}")]
    BadWord(String),

    #[error("Calldata disagrees with the log on {0}")]
    LogMismatch(&'static str),
}

/// First four bytes of keccak-256 of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decoded `joinTournament` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinTournamentCall {
    pub final_state: Hash,
    pub proof: Vec<Hash>,
    pub left_node: Hash,
    pub right_node: Hash,
}

impl JoinTournamentCall {
    pub fn decode(input: &[u8]) -> Result<Self, CalldataError> {
        let args = strip_selector(input, JOIN_TOURNAMENT_SIGNATURE)?;

        let final_state = word(args, 0)?;
        let proof_offset = word_as_usize(&word(args, 1)?)?;
        let left_node = word(args, 2)?;
        let right_node = word(args, 3)?;

        if proof_offset % WORD != 0 {
            return Err(CalldataError::BadWord(format!(
                "unaligned proof offset {}",
                proof_offset
            )));
        }
        let len_index = proof_offset / WORD;
        let len = word_as_usize(&word(args, len_index)?)?;

        // Bound the length by what the payload can hold before allocating.
        let available = args.len() / WORD;
        if len > available.saturating_sub(len_index + 1) {
            return Err(CalldataError::BadWord(format!(
                "proof length {} exceeds payload",
                len
            )));
        }

        let proof = (0..len)
            .map(|i| word(args, len_index + 1 + i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            final_state,
            proof,
            left_node,
            right_node,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + WORD * (5 + self.proof.len()));
        out.extend_from_slice(&selector(JOIN_TOURNAMENT_SIGNATURE));
        out.extend_from_slice(&self.final_state);
        out.extend_from_slice(&usize_word(4 * WORD));
        out.extend_from_slice(&self.left_node);
        out.extend_from_slice(&self.right_node);
        out.extend_from_slice(&usize_word(self.proof.len()));
        for sibling in &self.proof {
            out.extend_from_slice(sibling);
        }
        out
    }
}

/// Decoded `advanceMatch` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvanceMatchCall {
    pub one: Hash,
    pub two: Hash,
    pub left_node: Hash,
    pub right_node: Hash,
    pub new_left_node: Hash,
    pub new_right_node: Hash,
}

impl AdvanceMatchCall {
    pub fn decode(input: &[u8]) -> Result<Self, CalldataError> {
        let args = strip_selector(input, ADVANCE_MATCH_SIGNATURE)?;
        Ok(Self {
            one: word(args, 0)?,
            two: word(args, 1)?,
            left_node: word(args, 2)?,
            right_node: word(args, 3)?,
            new_left_node: word(args, 4)?,
            new_right_node: word(args, 5)?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + WORD * 6);
        out.extend_from_slice(&selector(ADVANCE_MATCH_SIGNATURE));
        for w in [
            &self.one,
            &self.two,
            &self.left_node,
            &self.right_node,
            &self.new_left_node,
            &self.new_right_node,
        ] {
            out.extend_from_slice(w);
        }
        out
    }

    /// Id of the match this call advances.
    pub fn match_id(&self) -> Hash {
        derive_match_id(&self.one, &self.two)
    }
}

// =============================================================================
// WORD HELPERS
// =============================================================================

fn strip_selector<'a>(input: &'a [u8], signature: &str) -> Result<&'a [u8], CalldataError> {
    if input.len() < 4 {
        return Err(CalldataError::TooShort {
            expected: 4,
            actual: input.len(),
        });
    }
    let expected = selector(signature);
    let actual = [input[0], input[1], input[2], input[3]];
    if expected != actual {
        return Err(CalldataError::SelectorMismatch { expected, actual });
    }
    Ok(&input[4..])
}

fn word(args: &[u8], index: usize) -> Result<Hash, CalldataError> {
    let (start, end) = index
        .checked_mul(WORD)
        .and_then(|start| start.checked_add(WORD).map(|end| (start, end)))
        .ok_or_else(|| CalldataError::BadWord(format!("word index {}", index)))?;
    let slice = args.get(start..end).ok_or(CalldataError::TooShort {
        expected: 4 + end,
        actual: 4 + args.len(),
    })?;
    let mut out = [0u8; WORD];
    out.copy_from_slice(slice);
    Ok(out)
}

fn word_as_usize(word: &Hash) -> Result<usize, CalldataError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(CalldataError::BadWord(format!(
            "0x{} does not fit in 64 bits",
            hex::encode(word)
        )));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| CalldataError::BadWord("value exceeds usize".to_string()))
}

fn usize_word(value: usize) -> Hash {
    let mut out = [0u8; WORD];
    out[24..].copy_from_slice(&(value as u64).to_be_bytes());
    out
}
