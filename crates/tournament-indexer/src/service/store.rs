//! # Entity Store Operations
//!
//! Idempotent upserts, status transitions and structured lookups over a
//! single store transaction. This is the only code that writes entities;
//! handlers go through it, never through the raw port.
//!
//! ## Idempotency
//!
//! | Stored | Incoming | Result |
//! |--------|----------|--------|
//! | none | any | `Upsert::Created` |
//! | same payload | same payload | `Upsert::Unchanged` |
//! | different payload | any | `DuplicateEntity` |

use shared_types::{short_hex, to_hex, Address, Hash};

use crate::domain::{
    commitment_id, Commitment, CommitmentStatus, Match, MatchStatus, Step, Tournament, Verdict,
};
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::ports::outbound::StoreTransaction;

/// Whether an upsert wrote anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Unchanged,
}

/// Entity operations bound to one open transaction.
pub struct Entities<'t, T: StoreTransaction> {
    tx: &'t mut T,
}

impl<'t, T: StoreTransaction> Entities<'t, T> {
    pub fn new(tx: &'t mut T) -> Self {
        Self { tx }
    }

    // =========================================================================
    // TOURNAMENTS
    // =========================================================================

    pub fn tournament(&self, id: &Address) -> EngineResult<Option<Tournament>> {
        Ok(self.tx.tournament(id)?)
    }

    pub fn create_tournament(&mut self, tournament: Tournament) -> EngineResult<Upsert> {
        match self.tx.tournament(&tournament.id)? {
            Some(existing) if existing == tournament => Ok(Upsert::Unchanged),
            Some(existing) => {
                tracing::error!(
                    tournament = %to_hex(&tournament.id),
                    stored_level = existing.level,
                    incoming_level = tournament.level,
                    "Tournament replay differs from stored record"
                );
                Err(duplicate(EntityKind::Tournament, &tournament.id))
            }
            None => {
                self.tx.put_tournament(tournament)?;
                Ok(Upsert::Created)
            }
        }
    }

    // =========================================================================
    // COMMITMENTS
    // =========================================================================

    pub fn commitment(&self, id: &Hash) -> EngineResult<Option<Commitment>> {
        Ok(self.tx.commitment(id)?)
    }

    /// Commitment for `claim_root` inside `tournament`, if joined.
    pub fn commitment_in(
        &self,
        tournament: &Address,
        claim_root: &Hash,
    ) -> EngineResult<Option<Commitment>> {
        self.commitment(&commitment_id(claim_root, tournament))
    }

    pub fn create_commitment(&mut self, commitment: Commitment) -> EngineResult<Upsert> {
        match self.tx.commitment(&commitment.id)? {
            Some(existing) if existing.same_payload(&commitment) => Ok(Upsert::Unchanged),
            Some(_) => Err(duplicate(EntityKind::Commitment, &commitment.id)),
            None => {
                self.tx.put_commitment(commitment)?;
                Ok(Upsert::Created)
            }
        }
    }

    pub fn set_commitment_status(
        &mut self,
        id: &Hash,
        status: CommitmentStatus,
    ) -> EngineResult<Commitment> {
        let mut commitment = self.require_commitment(id)?;
        if !commitment.status.can_transition_to(status) {
            return Err(EngineError::InvalidTransition {
                entity: EntityKind::Commitment,
                id: to_hex(id),
                from: commitment.status.to_string(),
                to: status.to_string(),
            });
        }
        if commitment.status != status {
            commitment.status = status;
            self.tx.put_commitment(commitment.clone())?;
        }
        Ok(commitment)
    }

    /// Move a commitment into `match_id`.
    ///
    /// WAITING commitments start PLAYING. A commitment already linked to
    /// `match_id` is left alone, whatever its status. A PLAYING commitment whose previous match
    /// has finished advances into the new pairing. Anything else would put
    /// one claim in two open matches, or revive a resolved claim.
    pub fn pair_commitment(&mut self, id: &Hash, match_id: &Hash) -> EngineResult<Upsert> {
        let mut commitment = self.require_commitment(id)?;

        if commitment.match_id.as_ref() == Some(match_id)
            && commitment.status != CommitmentStatus::Waiting
        {
            return Ok(Upsert::Unchanged);
        }

        match commitment.status {
            CommitmentStatus::Waiting => {}
            CommitmentStatus::Playing => {
                let previous_open = match &commitment.match_id {
                    Some(previous) => self
                        .tx
                        .get_match(previous)?
                        .map_or(false, |m| m.is_open()),
                    None => false,
                };
                if previous_open {
                    return Err(pairing_conflict(&commitment, match_id));
                }
            }
            CommitmentStatus::Won | CommitmentStatus::Lost => {
                return Err(pairing_conflict(&commitment, match_id));
            }
        }

        commitment.status = CommitmentStatus::Playing;
        commitment.match_id = Some(*match_id);
        self.tx.put_commitment(commitment)?;
        Ok(Upsert::Created)
    }

    /// The (up to two) joined commitments paired by a match.
    pub fn list_commitments_for_match(&self, match_id: &Hash) -> EngineResult<Vec<Commitment>> {
        let m = self.require_match(match_id)?;
        let mut out = Vec::with_capacity(2);
        for root in [&m.one, &m.two] {
            if let Some(commitment) = self.commitment_in(&m.tournament, root)? {
                out.push(commitment);
            }
        }
        Ok(out)
    }

    fn require_commitment(&self, id: &Hash) -> EngineResult<Commitment> {
        self.tx
            .commitment(id)?
            .ok_or_else(|| missing(EntityKind::Commitment, id))
    }

    // =========================================================================
    // MATCHES
    // =========================================================================

    pub fn get_match(&self, id: &Hash) -> EngineResult<Option<Match>> {
        Ok(self.tx.get_match(id)?)
    }

    pub fn create_match(&mut self, m: Match) -> EngineResult<Upsert> {
        match self.tx.get_match(&m.id)? {
            Some(existing) if existing.same_payload(&m) => Ok(Upsert::Unchanged),
            Some(_) => Err(duplicate(EntityKind::Match, &m.id)),
            None => {
                self.tx.put_match(m)?;
                Ok(Upsert::Created)
            }
        }
    }

    /// PLAYING match of `tournament` pairing `claim_root`, if any.
    pub fn find_open_match_for_commitment(
        &self,
        tournament: &Address,
        claim_root: &Hash,
    ) -> EngineResult<Option<Match>> {
        Ok(self
            .tx
            .matches_by_tournament(tournament)?
            .into_iter()
            .find(|m| m.is_open() && m.involves(claim_root)))
    }

    pub fn set_match_status(&mut self, id: &Hash, status: MatchStatus) -> EngineResult<Match> {
        let mut m = self.require_match(id)?;
        if !m.status.can_transition_to(status) {
            return Err(EngineError::InvalidTransition {
                entity: EntityKind::Match,
                id: to_hex(id),
                from: m.status.to_string(),
                to: status.to_string(),
            });
        }
        if m.status != status {
            m.status = status;
            self.tx.put_match(m.clone())?;
        }
        Ok(m)
    }

    /// Attach the decisive result observed when the match finished.
    ///
    /// A chain verdict is final, so a replay must observe the same one.
    pub fn record_resolution(&mut self, id: &Hash, verdict: Verdict) -> EngineResult<Upsert> {
        let mut m = self.require_match(id)?;
        match m.resolution {
            Some(existing) if existing == verdict => Ok(Upsert::Unchanged),
            Some(existing) => Err(EngineError::InvalidTransition {
                entity: EntityKind::Match,
                id: to_hex(id),
                from: format!("resolved({})", short_hex(&existing.winning_claim_root)),
                to: format!("resolved({})", short_hex(&verdict.winning_claim_root)),
            }),
            None => {
                m.resolution = Some(verdict);
                self.tx.put_match(m)?;
                Ok(Upsert::Created)
            }
        }
    }

    fn require_match(&self, id: &Hash) -> EngineResult<Match> {
        self.tx
            .get_match(id)?
            .ok_or_else(|| missing(EntityKind::Match, id))
    }

    /// Match `id` owned by `tournament`.
    ///
    /// Match ids are not scoped by tournament, so a match held by another
    /// tournament is reported as missing from this one.
    pub fn require_match_in(&self, tournament: &Address, id: &Hash) -> EngineResult<Match> {
        self.tx
            .get_match(id)?
            .filter(|m| &m.tournament == tournament)
            .ok_or_else(|| missing(EntityKind::Match, id))
    }

    // =========================================================================
    // STEPS
    // =========================================================================

    /// Append a step to an open match.
    pub fn append_step(&mut self, step: Step) -> EngineResult<Upsert> {
        if let Some(existing) = self.tx.step(&step.id)? {
            if existing == step {
                return Ok(Upsert::Unchanged);
            }
            return Err(duplicate(EntityKind::Step, &step.id));
        }

        let m = self.require_match(&step.match_id)?;
        if !m.is_open() {
            return Err(EngineError::InvalidTransition {
                entity: EntityKind::Match,
                id: to_hex(&m.id),
                from: m.status.to_string(),
                to: "advanced".to_string(),
            });
        }

        self.tx.push_step(step)?;
        Ok(Upsert::Created)
    }
}

fn duplicate(entity: EntityKind, id: &[u8]) -> EngineError {
    EngineError::DuplicateEntity {
        entity,
        id: to_hex(id),
    }
}

fn missing(entity: EntityKind, id: &[u8]) -> EngineError {
    EngineError::MissingEntity {
        entity,
        id: to_hex(id),
    }
}

fn pairing_conflict(commitment: &Commitment, match_id: &Hash) -> EngineError {
    let current = commitment
        .match_id
        .map(|m| short_hex(&m))
        .unwrap_or_else(|| "-".to_string());
    EngineError::InvalidTransition {
        entity: EntityKind::Commitment,
        id: to_hex(&commitment.id),
        from: format!("{}({})", commitment.status, current),
        to: format!("PLAYING({})", short_hex(match_id)),
    }
}
