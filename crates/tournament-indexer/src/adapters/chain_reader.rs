//! Static chain reader
//!
//! Answers resolution queries from values set up front. Tournaments with
//! no configured answer report an undecided result, like a live contract
//! whose dispute is still running.

use parking_lot::RwLock;
use shared_types::{to_hex, Address};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::domain::{ArbitrationResult, InnerTournamentWinner};
use crate::ports::outbound::{ChainError, ChainReader, ChainResult};

/// In-memory implementation of ChainReader
#[derive(Default)]
pub struct StaticChainReader {
    inner_winners: RwLock<HashMap<Address, InnerTournamentWinner>>,
    arbitration: RwLock<HashMap<Address, ArbitrationResult>>,
    failing_reads: AtomicUsize,
    reads: AtomicU64,
}

impl StaticChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_inner_winner(&self, tournament: Address, winner: InnerTournamentWinner) {
        self.inner_winners.write().insert(tournament, winner);
    }

    pub fn set_arbitration_result(&self, tournament: Address, result: ArbitrationResult) {
        self.arbitration.write().insert(tournament, result);
    }

    /// Make the next `n` reads fail with `ChainError::Unavailable`.
    pub fn fail_next(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    /// Number of reads served or failed so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_available(&self, method: &str, tournament: &Address) -> ChainResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ChainError::Unavailable(format!(
                "{} on {}: injected failure",
                method,
                to_hex(tournament)
            )));
        }
        Ok(())
    }
}

impl ChainReader for StaticChainReader {
    fn read_inner_tournament_winner(
        &self,
        tournament: &Address,
    ) -> ChainResult<InnerTournamentWinner> {
        self.check_available("innerTournamentWinner", tournament)?;
        Ok(self
            .inner_winners
            .read()
            .get(tournament)
            .copied()
            .unwrap_or_else(InnerTournamentWinner::undecided))
    }

    fn read_arbitration_result(&self, tournament: &Address) -> ChainResult<ArbitrationResult> {
        self.check_available("arbitrationResult", tournament)?;
        Ok(self
            .arbitration
            .read()
            .get(tournament)
            .copied()
            .unwrap_or_else(ArbitrationResult::undecided))
    }
}
