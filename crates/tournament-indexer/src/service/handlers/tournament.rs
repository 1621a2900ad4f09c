//! Tournament creation: factory roots and inner tournaments spawned by
//! sealed matches.

use shared_types::{short_hex, to_hex, Address, ChainEvent, Hash, TOP_LEVEL};

use crate::config::IndexerConfig;
use crate::domain::Tournament;
use crate::error::{EngineError, EngineResult};
use crate::ports::outbound::StoreTransaction;
use crate::service::store::{Entities, Upsert};

pub fn handle_tournament_created<T: StoreTransaction>(
    event: &ChainEvent,
    entities: &mut Entities<'_, T>,
    config: &IndexerConfig,
) -> EngineResult<()> {
    config.check_depth(TOP_LEVEL)?;

    let tournament = Tournament::root(event.contract, event.block_timestamp);
    if entities.create_tournament(tournament)? == Upsert::Created {
        tracing::info!(tournament = %to_hex(&event.contract), "Root tournament created");
    }
    Ok(())
}

/// Create the child of `match_id` one level below the emitting tournament.
pub fn handle_new_inner_tournament<T: StoreTransaction>(
    event: &ChainEvent,
    match_id: &Hash,
    child: &Address,
    entities: &mut Entities<'_, T>,
    config: &IndexerConfig,
) -> EngineResult<()> {
    let parent_match = entities.require_match_in(&event.contract, match_id)?;

    let level = event
        .level
        .checked_add(1)
        .ok_or(EngineError::DepthExceeded {
            level: event.level,
            max_depth: event.level,
        })?;
    config.check_depth(level)?;

    let tournament = Tournament::inner(
        *child,
        level,
        event.block_timestamp,
        parent_match.id,
        event.contract,
    );
    if entities.create_tournament(tournament)? == Upsert::Created {
        tracing::info!(
            tournament = %to_hex(child),
            parent = %to_hex(&event.contract),
            match_id = %short_hex(match_id),
            level,
            "Inner tournament created"
        );
    }
    Ok(())
}
