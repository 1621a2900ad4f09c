//! Commitment joins and causal repair.
//!
//! A match can be created before the second claim's join is delivered.
//! Every join therefore looks for an open match already pairing its root
//! and, if one exists, starts PLAYING inside it.

use shared_types::{short_hex, to_hex, ChainEvent, Hash};

use crate::domain::{commitment_id, Commitment, CommitmentStatus, JoinTournamentCall};
use crate::error::{EngineError, EngineResult};
use crate::ports::outbound::StoreTransaction;
use crate::service::store::{Entities, Upsert};

pub fn handle_commitment_joined<T: StoreTransaction>(
    event: &ChainEvent,
    root: &Hash,
    entities: &mut Entities<'_, T>,
) -> EngineResult<()> {
    let call = JoinTournamentCall::decode(&event.tx_input).map_err(|source| {
        EngineError::MalformedPayload {
            event: event.kind.name(),
            source,
        }
    })?;

    let id = commitment_id(root, &event.contract);
    let open_match = entities.find_open_match_for_commitment(&event.contract, root)?;
    let (status, match_id) = match &open_match {
        Some(m) => (CommitmentStatus::Playing, Some(m.id)),
        None => (CommitmentStatus::Waiting, None),
    };

    let commitment = Commitment {
        id,
        tournament: event.contract,
        claim_root: *root,
        created_at: event.block_timestamp,
        party: event.tx_sender,
        left_node: call.left_node,
        right_node: call.right_node,
        proof: call.proof,
        machine_hash: call.final_state,
        status,
        match_id,
    };

    match entities.create_commitment(commitment)? {
        Upsert::Created => match match_id {
            Some(match_id) => tracing::info!(
                tournament = %to_hex(&event.contract),
                commitment = %short_hex(&id),
                match_id = %short_hex(&match_id),
                "Commitment joined into existing match"
            ),
            None => tracing::info!(
                tournament = %to_hex(&event.contract),
                commitment = %short_hex(&id),
                "Commitment joined, waiting for a match"
            ),
        },
        Upsert::Unchanged => tracing::debug!(
            commitment = %short_hex(&id),
            "Commitment join replayed"
        ),
    }
    Ok(())
}
