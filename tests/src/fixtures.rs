//! Shared harness for integration flows.

use shared_types::{Address, ChainEvent, Hash};
use std::sync::Arc;
use tournament_indexer::adapters::{InMemoryEntityStore, StaticChainReader, StoreSnapshot};
use tournament_indexer::domain::{commitment_id, derive_match_id};
use tournament_indexer::{
    Commitment, CommitmentStatus, DispatchOutcome, EngineResult, EventIngestionApi,
    IndexerConfig, IndexerService, Match, TournamentQueryApi,
};

pub type MemoryService = IndexerService<InMemoryEntityStore, StaticChainReader>;

/// An indexer wired to in-memory adapters the test can reach into.
pub struct Harness {
    pub service: Arc<MemoryService>,
    pub store: Arc<InMemoryEntityStore>,
    pub chain: Arc<StaticChainReader>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(IndexerConfig::default())
    }

    pub fn with_config(config: IndexerConfig) -> Self {
        dispute_telemetry::init_test_logging();

        let store = Arc::new(InMemoryEntityStore::new());
        let chain = Arc::new(StaticChainReader::new());
        let service = Arc::new(IndexerService::new(
            config,
            Arc::clone(&store),
            Arc::clone(&chain),
        ));
        Self {
            service,
            store,
            chain,
        }
    }

    pub fn dispatch(&self, event: &ChainEvent) -> EngineResult<DispatchOutcome> {
        self.service.dispatch(event)
    }

    /// Dispatch every event, panicking on the first fault.
    pub fn dispatch_all<'a>(
        &self,
        events: impl IntoIterator<Item = &'a ChainEvent>,
    ) -> Vec<DispatchOutcome> {
        events
            .into_iter()
            .map(|event| {
                self.dispatch(event).unwrap_or_else(|err| {
                    panic!("{} on {} failed: {}", event.kind.name(), hex(&event.contract), err)
                })
            })
            .collect()
    }

    pub fn commitment(&self, tournament: Address, root: Hash) -> Option<Commitment> {
        self.service
            .get_commitment(&commitment_id(&root, &tournament))
            .unwrap()
    }

    pub fn status(&self, tournament: Address, root: Hash) -> CommitmentStatus {
        self.commitment(tournament, root)
            .map(|c| c.status)
            .unwrap_or_else(|| panic!("no commitment {} in {}", hex(&root), hex(&tournament)))
    }

    pub fn get_match(&self, one: Hash, two: Hash) -> Option<Match> {
        self.service.get_match(&derive_match_id(&one, &two)).unwrap()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

fn hex(bytes: &[u8]) -> String {
    shared_types::short_hex(bytes)
}
