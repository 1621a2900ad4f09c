//! In-memory entity store
//!
//! Reference `EntityStore` for tests and offline replays. A transaction
//! holds the table lock for its whole lifetime, which gives serializable
//! isolation, and records an undo entry for every write. Dropping an
//! uncommitted transaction replays the journal backwards.
//!
//! The lock is a single table lock, not a per-address one. An open
//! transaction therefore blocks every other transaction and every query,
//! including while `match_deleted` waits on the chain reader. Dispatch stays
//! correct, but `AddressLocks` brings no extra parallelism over this adapter;
//! a backend with row or address scoped isolation does.

use parking_lot::{Mutex, MutexGuard};
use shared_types::{Address, Hash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{Commitment, Match, Step, Tournament};
use crate::ports::outbound::{EntityStore, StoreError, StoreResult, StoreTransaction};

#[derive(Default)]
struct Tables {
    tournaments: HashMap<Address, Tournament>,
    tournament_order: Vec<Address>,
    commitments: HashMap<Hash, Commitment>,
    commitment_order: Vec<Hash>,
    matches: HashMap<Hash, Match>,
    match_order: Vec<Hash>,
    steps: HashMap<Hash, Step>,
    step_order: Vec<Hash>,
}

/// Prior value of a row, restored on rollback.
enum Undo {
    Tournament(Address, Option<Tournament>),
    Commitment(Hash, Option<Commitment>),
    Match(Hash, Option<Match>),
    Step(Hash),
}

/// Ordered copy of every table, for comparing store states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub tournaments: Vec<Tournament>,
    pub commitments: Vec<Commitment>,
    pub matches: Vec<Match>,
    pub steps: Vec<Step>,
}

/// In-memory implementation of EntityStore
pub struct InMemoryEntityStore {
    tables: Mutex<Tables>,
    failing_commits: AtomicUsize,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            failing_commits: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` commits fail with `StoreError::Unavailable`.
    pub fn fail_next_commits(&self, n: usize) {
        self.failing_commits.store(n, Ordering::SeqCst);
    }

    /// Copy of the committed state, in insertion order.
    pub fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.lock();
        StoreSnapshot {
            tournaments: ordered(&tables.tournament_order, &tables.tournaments),
            commitments: ordered(&tables.commitment_order, &tables.commitments),
            matches: ordered(&tables.match_order, &tables.matches),
            steps: ordered(&tables.step_order, &tables.steps),
        }
    }

    fn take_commit_failure(&self) -> bool {
        self.failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for InMemoryEntityStore {
    type Transaction<'a> = MemoryTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> StoreResult<MemoryTransaction<'_>> {
        Ok(MemoryTransaction {
            store: self,
            tables: self.tables.lock(),
            journal: Vec::new(),
            committed: false,
        })
    }
}

/// Open unit of work over `InMemoryEntityStore`.
pub struct MemoryTransaction<'a> {
    store: &'a InMemoryEntityStore,
    tables: MutexGuard<'a, Tables>,
    journal: Vec<Undo>,
    committed: bool,
}

impl MemoryTransaction<'_> {
    fn rollback(&mut self) {
        let tables = &mut *self.tables;
        for undo in self.journal.drain(..).rev() {
            match undo {
                Undo::Tournament(id, Some(prev)) => {
                    tables.tournaments.insert(id, prev);
                }
                Undo::Tournament(id, None) => {
                    tables.tournaments.remove(&id);
                    remove_last(&mut tables.tournament_order, &id);
                }
                Undo::Commitment(id, Some(prev)) => {
                    tables.commitments.insert(id, prev);
                }
                Undo::Commitment(id, None) => {
                    tables.commitments.remove(&id);
                    remove_last(&mut tables.commitment_order, &id);
                }
                Undo::Match(id, Some(prev)) => {
                    tables.matches.insert(id, prev);
                }
                Undo::Match(id, None) => {
                    tables.matches.remove(&id);
                    remove_last(&mut tables.match_order, &id);
                }
                Undo::Step(id) => {
                    tables.steps.remove(&id);
                    remove_last(&mut tables.step_order, &id);
                }
            }
        }
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.journal.is_empty() {
            tracing::debug!(writes = self.journal.len(), "Rolling back transaction");
            self.rollback();
        }
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn tournament(&self, id: &Address) -> StoreResult<Option<Tournament>> {
        Ok(self.tables.tournaments.get(id).cloned())
    }

    fn put_tournament(&mut self, tournament: Tournament) -> StoreResult<()> {
        let id = tournament.id;
        let prev = self.tables.tournaments.insert(id, tournament);
        if prev.is_none() {
            self.tables.tournament_order.push(id);
        }
        self.journal.push(Undo::Tournament(id, prev));
        Ok(())
    }

    fn child_tournaments(&self, parent: &Address) -> StoreResult<Vec<Tournament>> {
        Ok(self
            .tables
            .tournament_order
            .iter()
            .filter_map(|id| self.tables.tournaments.get(id))
            .filter(|t| t.parent_tournament.as_ref() == Some(parent))
            .cloned()
            .collect())
    }

    fn commitment(&self, id: &Hash) -> StoreResult<Option<Commitment>> {
        Ok(self.tables.commitments.get(id).cloned())
    }

    fn put_commitment(&mut self, commitment: Commitment) -> StoreResult<()> {
        let id = commitment.id;
        let prev = self.tables.commitments.insert(id, commitment);
        if prev.is_none() {
            self.tables.commitment_order.push(id);
        }
        self.journal.push(Undo::Commitment(id, prev));
        Ok(())
    }

    fn commitments_by_tournament(&self, tournament: &Address) -> StoreResult<Vec<Commitment>> {
        Ok(self
            .tables
            .commitment_order
            .iter()
            .filter_map(|id| self.tables.commitments.get(id))
            .filter(|c| &c.tournament == tournament)
            .cloned()
            .collect())
    }

    fn get_match(&self, id: &Hash) -> StoreResult<Option<Match>> {
        Ok(self.tables.matches.get(id).cloned())
    }

    fn put_match(&mut self, m: Match) -> StoreResult<()> {
        let id = m.id;
        let prev = self.tables.matches.insert(id, m);
        if prev.is_none() {
            self.tables.match_order.push(id);
        }
        self.journal.push(Undo::Match(id, prev));
        Ok(())
    }

    fn matches_by_tournament(&self, tournament: &Address) -> StoreResult<Vec<Match>> {
        Ok(self
            .tables
            .match_order
            .iter()
            .filter_map(|id| self.tables.matches.get(id))
            .filter(|m| &m.tournament == tournament)
            .cloned()
            .collect())
    }

    fn step(&self, id: &Hash) -> StoreResult<Option<Step>> {
        Ok(self.tables.steps.get(id).cloned())
    }

    fn push_step(&mut self, step: Step) -> StoreResult<()> {
        let id = step.id;
        if self.tables.steps.contains_key(&id) {
            return Err(StoreError::Backend(format!(
                "step {} already appended",
                hex::encode(id)
            )));
        }
        self.tables.steps.insert(id, step);
        self.tables.step_order.push(id);
        self.journal.push(Undo::Step(id));
        Ok(())
    }

    fn steps_by_match(&self, match_id: &Hash) -> StoreResult<Vec<Step>> {
        Ok(self
            .tables
            .step_order
            .iter()
            .filter_map(|id| self.tables.steps.get(id))
            .filter(|s| &s.match_id == match_id)
            .cloned()
            .collect())
    }

    fn commit(mut self) -> StoreResult<()> {
        if self.store.take_commit_failure() {
            // Drop rolls the journal back.
            return Err(StoreError::Unavailable("injected commit failure".into()));
        }
        self.journal.clear();
        self.committed = true;
        Ok(())
    }
}

fn ordered<K: std::hash::Hash + Eq, V: Clone>(order: &[K], rows: &HashMap<K, V>) -> Vec<V> {
    order.iter().filter_map(|k| rows.get(k)).cloned().collect()
}

fn remove_last<K: PartialEq>(order: &mut Vec<K>, key: &K) {
    if let Some(pos) = order.iter().rposition(|k| k == key) {
        order.remove(pos);
    }
}
