//! # Inbound Ports (Driving Ports)
//!
//! APIs exposed by the reconstruction engine.

use shared_types::{Address, ChainEvent, Hash};

use crate::domain::{Commitment, Match, Step, Tournament};
use crate::error::EngineResult;

/// Result of dispatching one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// All derived writes were committed.
    Applied,
    /// The level resolver rejected the event; nothing was written.
    Skipped,
}

/// Event ingestion, called once per observed log by the delivery side.
pub trait EventIngestionApi {
    /// Apply one event in its own unit of work.
    ///
    /// ## Returns
    ///
    /// - `Ok(Applied)`: every derived write committed
    /// - `Ok(Skipped)`: address not owned by the event's level
    /// - `Err(_)`: nothing committed; transient errors expect redelivery
    fn dispatch(&self, event: &ChainEvent) -> EngineResult<DispatchOutcome>;
}

/// Read-only query contract of the materialized view.
pub trait TournamentQueryApi {
    fn get_tournament(&self, id: &Address) -> EngineResult<Option<Tournament>>;

    /// Tournaments spawned by matches of `id`, in creation order.
    fn child_tournaments(&self, id: &Address) -> EngineResult<Vec<Tournament>>;

    fn get_commitment(&self, id: &Hash) -> EngineResult<Option<Commitment>>;

    /// Commitments joined to `tournament`, in join order.
    fn commitments_for_tournament(&self, tournament: &Address) -> EngineResult<Vec<Commitment>>;

    /// Matches created in `tournament`, in creation order.
    fn matches_for_tournament(&self, tournament: &Address) -> EngineResult<Vec<Match>>;

    fn get_match(&self, id: &Hash) -> EngineResult<Option<Match>>;

    /// Steps of a match, in the order they were appended.
    fn steps_for_match(&self, match_id: &Hash) -> EngineResult<Vec<Step>>;
}
