//! # Event Handlers
//!
//! One handler per event kind, all parameterized by the level of the
//! handler set that observed the log. Handlers are plain functions over
//! the event, the open unit of work and the chain reader; they never
//! commit.

mod commitment;
mod matches;
mod tournament;

use shared_types::{ChainEvent, EventKind};

use crate::config::IndexerConfig;
use crate::error::EngineResult;
use crate::ports::inbound::DispatchOutcome;
use crate::ports::outbound::{ChainReader, StoreTransaction};

use super::resolver::should_skip_event;
use super::store::Entities;

pub use commitment::handle_commitment_joined;
pub use matches::{handle_match_advanced, handle_match_created, handle_match_deleted};
pub use tournament::{handle_new_inner_tournament, handle_tournament_created};

/// Route one event to its handler inside an open unit of work.
///
/// Events below the top level are checked against the level resolver
/// first; a rejected event writes nothing.
pub fn dispatch<T: StoreTransaction, C: ChainReader + ?Sized>(
    event: &ChainEvent,
    entities: &mut Entities<'_, T>,
    chain: &C,
    config: &IndexerConfig,
) -> EngineResult<DispatchOutcome> {
    if !event.is_top_level() && should_skip_event(entities, &event.contract, event.level)? {
        return Ok(DispatchOutcome::Skipped);
    }

    match &event.kind {
        EventKind::TournamentCreated => handle_tournament_created(event, entities, config)?,
        EventKind::CommitmentJoined { root } => handle_commitment_joined(event, root, entities)?,
        EventKind::MatchCreated {
            one,
            two,
            left_of_two,
        } => handle_match_created(event, one, two, left_of_two, entities)?,
        EventKind::MatchAdvanced {
            match_id,
            parent,
            left,
        } => handle_match_advanced(event, match_id, parent, left, entities)?,
        EventKind::MatchDeleted { match_id } => {
            handle_match_deleted(event, match_id, entities, chain)?
        }
        EventKind::NewInnerTournament { match_id, child } => {
            handle_new_inner_tournament(event, match_id, child, entities, config)?
        }
    }

    Ok(DispatchOutcome::Applied)
}
