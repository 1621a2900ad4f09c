//! # Level Resolver
//!
//! The same contract address can surface in the handler sets of several
//! levels. An event is processed only by the level that owns the address:
//! the one whose `Tournament` record was created at that level.
//!
//! Top-level events bypass this check; the factory is the only source of
//! level-0 addresses.

use shared_types::{to_hex, Address, Level};

use crate::error::EngineResult;
use crate::ports::outbound::StoreTransaction;

use super::store::Entities;

/// Whether an event observed at `expected_level` must be ignored.
///
/// A missing tournament is not an error: the address belongs to a level
/// whose tournament creation has not been seen by this handler set.
pub fn should_skip_event<T: StoreTransaction>(
    entities: &Entities<'_, T>,
    contract: &Address,
    expected_level: Level,
) -> EngineResult<bool> {
    let skip = match entities.tournament(contract)? {
        None => {
            tracing::debug!(
                tournament = %to_hex(contract),
                level = expected_level,
                "Unknown tournament address, skipping"
            );
            true
        }
        Some(tournament) if tournament.level != expected_level => {
            tracing::debug!(
                tournament = %to_hex(contract),
                level = expected_level,
                owner_level = tournament.level,
                "Address owned by another level, skipping"
            );
            true
        }
        Some(_) => false,
    };
    Ok(skip)
}
