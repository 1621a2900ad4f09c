//! # Outbound Ports (Driven Ports)
//!
//! SPIs required by the reconstruction engine.

use shared_types::{Address, Hash};
use thiserror::Error;

use crate::domain::{
    ArbitrationResult, Commitment, InnerTournamentWinner, Match, Step, Tournament,
};

/// Storage operation errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Backend temporarily unable to serve (busy, connection lost).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend failure that retrying will not fix.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent home of the materialized view.
///
/// Each event runs inside one transaction. The backend must give at least
/// serializable isolation per tournament address for the transaction's
/// lifetime.
pub trait EntityStore: Send + Sync {
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    fn begin(&self) -> StoreResult<Self::Transaction<'_>>;
}

/// Raw row access inside one unit of work.
///
/// Writes are plain upserts; idempotency and transition rules are enforced
/// by `service::Entities` above this port. Dropping a transaction without
/// calling `commit` discards every write made through it.
pub trait StoreTransaction {
    fn tournament(&self, id: &Address) -> StoreResult<Option<Tournament>>;
    fn put_tournament(&mut self, tournament: Tournament) -> StoreResult<()>;
    /// Tournaments whose `parent_tournament` is `parent`, in insertion order.
    fn child_tournaments(&self, parent: &Address) -> StoreResult<Vec<Tournament>>;

    fn commitment(&self, id: &Hash) -> StoreResult<Option<Commitment>>;
    fn put_commitment(&mut self, commitment: Commitment) -> StoreResult<()>;
    fn commitments_by_tournament(&self, tournament: &Address) -> StoreResult<Vec<Commitment>>;

    fn get_match(&self, id: &Hash) -> StoreResult<Option<Match>>;
    fn put_match(&mut self, m: Match) -> StoreResult<()>;
    fn matches_by_tournament(&self, tournament: &Address) -> StoreResult<Vec<Match>>;

    fn step(&self, id: &Hash) -> StoreResult<Option<Step>>;
    /// Append a new step to its match's sequence.
    fn push_step(&mut self, step: Step) -> StoreResult<()>;
    fn steps_by_match(&self, match_id: &Hash) -> StoreResult<Vec<Step>>;

    fn commit(self) -> StoreResult<()>;
}

/// Chain read errors.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// Node unreachable, timed out or returned an unusable response.
    #[error("{0}")]
    Unavailable(String),
}

pub type ChainResult<T> = Result<T, ChainError>;

/// Synchronous read-only access to current on-chain tournament state.
pub trait ChainReader: Send + Sync {
    /// `innerTournamentWinner()` of a middle or bottom tournament.
    fn read_inner_tournament_winner(
        &self,
        tournament: &Address,
    ) -> ChainResult<InnerTournamentWinner>;

    /// `arbitrationResult()` of a top tournament.
    fn read_arbitration_result(&self, tournament: &Address) -> ChainResult<ArbitrationResult>;
}
