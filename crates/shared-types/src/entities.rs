//! # Primitive Identifiers
//!
//! Fixed-width byte identifiers used across the workspace.

/// A 32-byte hash (claim roots, tree nodes, match and entity ids).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address (tournament contracts, parties).
pub type Address = [u8; 20];

/// Unix timestamp in seconds, as reported by the block header.
pub type Timestamp = u64;

/// Tournament depth. `0` is the top level.
pub type Level = u8;

/// The top (root) tournament level.
pub const TOP_LEVEL: Level = 0;

/// All-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Full `0x`-prefixed hex rendering of an identifier.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Abbreviated hex rendering (first four bytes) for log lines.
pub fn short_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(4);
    format!("0x{}..", hex::encode(&bytes[..end]))
}
