//! Match lifecycle: pairing, bisection steps and resolution.

use shared_types::{short_hex, to_hex, ChainEvent, Hash};

use crate::domain::{
    commitment_id, derive_match_id, step_id, AdvanceMatchCall, CalldataError, Match, MatchStatus,
    Step, Verdict,
};
use crate::error::{EngineError, EngineResult};
use crate::metrics;
use crate::ports::outbound::{ChainReader, StoreTransaction};
use crate::service::store::{Entities, Upsert};

pub fn handle_match_created<T: StoreTransaction>(
    event: &ChainEvent,
    one: &Hash,
    two: &Hash,
    left_of_two: &Hash,
    entities: &mut Entities<'_, T>,
) -> EngineResult<()> {
    let match_id = derive_match_id(one, two);
    let created = Match {
        id: match_id,
        tournament: event.contract,
        one: *one,
        two: *two,
        left_of_two: *left_of_two,
        created_at: event.block_timestamp,
        status: MatchStatus::Playing,
        resolution: None,
    };

    if entities.create_match(created)? == Upsert::Unchanged {
        let finished = entities
            .get_match(&match_id)?
            .map_or(false, |m| !m.is_open());
        if finished {
            tracing::debug!(match_id = %short_hex(&match_id), "Finished match replayed");
            return Ok(());
        }
    }

    // Claims whose join has not been seen yet are linked by the join.
    for root in [one, two] {
        let id = commitment_id(root, &event.contract);
        if entities.commitment(&id)?.is_some() {
            entities.pair_commitment(&id, &match_id)?;
        }
    }

    tracing::info!(
        tournament = %to_hex(&event.contract),
        match_id = %short_hex(&match_id),
        one = %short_hex(one),
        two = %short_hex(two),
        "Match created"
    );
    Ok(())
}

pub fn handle_match_advanced<T: StoreTransaction>(
    event: &ChainEvent,
    match_id: &Hash,
    parent: &Hash,
    left: &Hash,
    entities: &mut Entities<'_, T>,
) -> EngineResult<()> {
    let malformed = |source: CalldataError| EngineError::MalformedPayload {
        event: event.kind.name(),
        source,
    };

    entities.require_match_in(&event.contract, match_id)?;

    let call = AdvanceMatchCall::decode(&event.tx_input).map_err(malformed)?;
    if call.match_id() != *match_id {
        return Err(malformed(CalldataError::LogMismatch("match id")));
    }
    if call.left_node != *left {
        return Err(malformed(CalldataError::LogMismatch("left node")));
    }

    let step = Step {
        id: step_id(match_id, parent, left),
        match_id: *match_id,
        party: event.tx_sender,
        parent: *parent,
        left_node: call.left_node,
        right_node: call.right_node,
        new_left_node: call.new_left_node,
        new_right_node: call.new_right_node,
        created_at: event.block_timestamp,
    };
    let id = step.id;

    match entities.append_step(step)? {
        Upsert::Created => tracing::debug!(
            match_id = %short_hex(match_id),
            step = %short_hex(&id),
            parent = %short_hex(parent),
            "Match advanced"
        ),
        Upsert::Unchanged => tracing::debug!(step = %short_hex(&id), "Step replayed"),
    }
    Ok(())
}

/// Finish the match, then ask the chain whether the dispute is decided.
pub fn handle_match_deleted<T: StoreTransaction, C: ChainReader + ?Sized>(
    event: &ChainEvent,
    match_id: &Hash,
    entities: &mut Entities<'_, T>,
    chain: &C,
) -> EngineResult<()> {
    entities.require_match_in(&event.contract, match_id)?;
    entities.set_match_status(match_id, MatchStatus::Finished)?;

    let verdict = read_verdict(event, chain)?;
    let Some(verdict) = verdict else {
        tracing::info!(
            tournament = %to_hex(&event.contract),
            match_id = %short_hex(match_id),
            "Match finished without a decisive result"
        );
        return Ok(());
    };

    entities.record_resolution(match_id, verdict)?;

    for commitment in entities.list_commitments_for_match(match_id)? {
        // Already advanced into a later pairing.
        if commitment.match_id.as_ref() != Some(match_id) {
            tracing::debug!(
                commitment = %short_hex(&commitment.id),
                match_id = %short_hex(match_id),
                "Commitment no longer linked to this match"
            );
            continue;
        }
        let outcome = verdict.outcome_for(&commitment);
        entities.set_commitment_status(&commitment.id, outcome)?;
        tracing::info!(
            commitment = %short_hex(&commitment.id),
            match_id = %short_hex(match_id),
            status = %outcome,
            "Commitment resolved"
        );
    }
    Ok(())
}

fn read_verdict<C: ChainReader + ?Sized>(
    event: &ChainEvent,
    chain: &C,
) -> EngineResult<Option<Verdict>> {
    let (method, read) = if event.is_top_level() {
        (
            "arbitrationResult",
            chain
                .read_arbitration_result(&event.contract)
                .map(|result| result.verdict()),
        )
    } else {
        (
            "innerTournamentWinner",
            chain
                .read_inner_tournament_winner(&event.contract)
                .map(|winner| winner.verdict()),
        )
    };

    match read {
        Ok(verdict) => {
            let outcome = if verdict.is_some() { "decisive" } else { "undecided" };
            metrics::record_chain_read(method, outcome);
            Ok(verdict)
        }
        Err(err) => {
            metrics::record_chain_read(method, "failed");
            tracing::warn!(
                tournament = %to_hex(&event.contract),
                method,
                error = %err,
                "Chain read failed"
            );
            Err(err.into())
        }
    }
}
