//! Indexer Service - event ingestion and the query side
//!
//! Each event is one unit of work:
//!
//! 1. Take the lock for the event's contract address
//! 2. Begin a store transaction
//! 3. Run the level resolver and the event's handler
//! 4. Commit on `Applied`; drop (roll back) on `Skipped` or on any error

pub mod handlers;
pub mod locks;
pub mod resolver;
pub mod store;

pub use handlers::dispatch;
pub use locks::AddressLocks;
pub use resolver::should_skip_event;
pub use store::{Entities, Upsert};

use shared_types::{to_hex, Address, ChainEvent, EventKind, Hash};
use std::sync::Arc;

use crate::config::IndexerConfig;
use crate::domain::{commitment_id, derive_match_id, Commitment, Match, Step, Tournament};
use crate::error::{EngineError, EngineResult};
use crate::metrics;
use crate::ports::inbound::{DispatchOutcome, EventIngestionApi, TournamentQueryApi};
use crate::ports::outbound::{ChainReader, EntityStore, StoreTransaction};

/// Indexer Service implementation
pub struct IndexerService<S, C>
where
    S: EntityStore,
    C: ChainReader,
{
    config: IndexerConfig,
    store: Arc<S>,
    chain: Arc<C>,
    locks: AddressLocks,
}

impl<S, C> IndexerService<S, C>
where
    S: EntityStore,
    C: ChainReader,
{
    pub fn new(config: IndexerConfig, store: Arc<S>, chain: Arc<C>) -> Self {
        Self {
            config,
            store,
            chain,
            locks: AddressLocks::new(),
        }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn apply(&self, event: &ChainEvent) -> EngineResult<DispatchOutcome> {
        let mut tx = self.store.begin()?;
        let outcome = {
            let mut entities = Entities::new(&mut tx);
            dispatch(event, &mut entities, self.chain.as_ref(), &self.config)?
        };
        if outcome == DispatchOutcome::Applied {
            tx.commit()?;
        }
        Ok(outcome)
    }
}

impl<S, C> EventIngestionApi for IndexerService<S, C>
where
    S: EntityStore,
    C: ChainReader,
{
    fn dispatch(&self, event: &ChainEvent) -> EngineResult<DispatchOutcome> {
        let kind = event.kind.name();
        let result = self.locks.with_lock(&event.contract, || self.apply(event));

        match &result {
            Ok(DispatchOutcome::Applied) => metrics::record_event_applied(kind),
            Ok(DispatchOutcome::Skipped) => metrics::record_event_skipped(kind),
            Err(err) => {
                metrics::record_fault(err.label());
                log_fault(event, err);
            }
        }
        result
    }
}

fn log_fault(event: &ChainEvent, err: &EngineError) {
    let entity = fault_subject(event);
    if err.is_transient() {
        tracing::warn!(
            tournament = %to_hex(&event.contract),
            level = event.level,
            kind = event.kind.name(),
            entity = %entity,
            error = %err,
            "Event aborted, awaiting redelivery"
        );
    } else {
        tracing::error!(
            tournament = %to_hex(&event.contract),
            level = event.level,
            kind = event.kind.name(),
            entity = %entity,
            error_kind = err.label(),
            error = %err,
            "Event rejected"
        );
    }
}

/// Full id of the entity the event addresses, for fault context.
fn fault_subject(event: &ChainEvent) -> String {
    match &event.kind {
        EventKind::TournamentCreated => to_hex(&event.contract),
        EventKind::CommitmentJoined { root } => to_hex(&commitment_id(root, &event.contract)),
        EventKind::MatchCreated { one, two, .. } => to_hex(&derive_match_id(one, two)),
        EventKind::MatchAdvanced { match_id, .. } | EventKind::MatchDeleted { match_id } => {
            to_hex(match_id)
        }
        EventKind::NewInnerTournament { child, .. } => to_hex(child),
    }
}

impl<S, C> TournamentQueryApi for IndexerService<S, C>
where
    S: EntityStore,
    C: ChainReader,
{
    fn get_tournament(&self, id: &Address) -> EngineResult<Option<Tournament>> {
        let tx = self.store.begin()?;
        Ok(tx.tournament(id)?)
    }

    fn child_tournaments(&self, id: &Address) -> EngineResult<Vec<Tournament>> {
        let tx = self.store.begin()?;
        Ok(tx.child_tournaments(id)?)
    }

    fn get_commitment(&self, id: &Hash) -> EngineResult<Option<Commitment>> {
        let tx = self.store.begin()?;
        Ok(tx.commitment(id)?)
    }

    fn commitments_for_tournament(&self, tournament: &Address) -> EngineResult<Vec<Commitment>> {
        let tx = self.store.begin()?;
        Ok(tx.commitments_by_tournament(tournament)?)
    }

    fn matches_for_tournament(&self, tournament: &Address) -> EngineResult<Vec<Match>> {
        let tx = self.store.begin()?;
        Ok(tx.matches_by_tournament(tournament)?)
    }

    fn get_match(&self, id: &Hash) -> EngineResult<Option<Match>> {
        let tx = self.store.begin()?;
        Ok(tx.get_match(id)?)
    }

    fn steps_for_match(&self, match_id: &Hash) -> EngineResult<Vec<Step>> {
        let tx = self.store.begin()?;
        Ok(tx.steps_by_match(match_id)?)
    }
}
