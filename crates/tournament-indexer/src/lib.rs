//! # tournament-indexer
//!
//! Event-sourced reconstruction of a multi-level tournament dispute tree.
//!
//! ## Overview
//!
//! Chain logs arrive one at a time, possibly out of logical order and
//! possibly more than once. The engine folds them into a materialized
//! view of:
//! - **Tournaments**: one per contract address, top → middle → bottom
//! - **Commitments**: claims joined to a tournament
//! - **Matches**: pairings of two commitments
//! - **Steps**: bisection rounds of a match
//!
//! ## Architecture
//!
//! ```text
//! delivery ──ChainEvent──→ IndexerService::dispatch
//!                              │ lock(address) + begin()
//!                              ├── Level Resolver (below the top level)
//!                              ├── Event Handler ──→ Entities ──→ EntityStore
//!                              │        └── ChainReader (match deletion only)
//!                              └── commit() | rollback
//! ```
//!
//! ## Guarantees
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | Replays are no-ops | deterministic ids, payload-compared upserts |
//! | Reused addresses handled once | level resolver |
//! | Late joins linked to their match | causal repair in the join handler |
//! | No partial events | one store transaction per event |
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tournament_indexer::{IndexerConfig, IndexerService};
//! use tournament_indexer::adapters::{InMemoryEntityStore, StaticChainReader};
//! use tournament_indexer::ports::inbound::EventIngestionApi;
//!
//! let service = IndexerService::new(
//!     IndexerConfig::from_env(),
//!     Arc::new(InMemoryEntityStore::new()),
//!     Arc::new(StaticChainReader::new()),
//! );
//!
//! for event in events {
//!     service.dispatch(&event)?;
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::IndexerConfig;
pub use domain::{
    ArbitrationResult, Commitment, CommitmentStatus, InnerTournamentWinner, Match, MatchStatus,
    Step, Tournament, Verdict,
};
pub use error::{EngineError, EngineResult, EntityKind};
pub use ports::inbound::{DispatchOutcome, EventIngestionApi, TournamentQueryApi};
pub use ports::outbound::{ChainError, ChainReader, EntityStore, StoreError, StoreTransaction};
pub use service::IndexerService;
