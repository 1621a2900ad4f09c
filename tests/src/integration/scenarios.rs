//! # Tournament Lifecycles
//!
//! Full flows from factory deployment to resolved claims.

#[cfg(test)]
mod tests {
    use tournament_indexer::domain::derive_match_id;
    use tournament_indexer::test_utils::*;
    use tournament_indexer::{CommitmentStatus, MatchStatus, TournamentQueryApi};

    use crate::fixtures::Harness;

    const TOP: [u8; 20] = [0x10; 20];

    #[test]
    fn test_two_claims_decided_at_top() {
        let h = Harness::new();
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        h.chain.set_arbitration_result(TOP, arbitration_won_by(&a));

        h.dispatch_all(&[
            tournament_created(TOP),
            commitment_joined(TOP, 0, a),
            commitment_joined(TOP, 0, b),
            match_created(TOP, 0, a, b),
        ]);

        let m = h.get_match(a, b).unwrap();
        assert_eq!(m.id, derive_match_id(&a, &b));
        assert_eq!(h.status(TOP, a), CommitmentStatus::Playing);
        assert_eq!(h.status(TOP, b), CommitmentStatus::Playing);
        assert_eq!(h.commitment(TOP, a).unwrap().match_id, Some(m.id));
        assert_eq!(h.commitment(TOP, b).unwrap().match_id, Some(m.id));

        h.dispatch_all(&[match_deleted(TOP, 0, a, b)]);

        assert_eq!(h.status(TOP, a), CommitmentStatus::Won);
        assert_eq!(h.status(TOP, b), CommitmentStatus::Lost);
        assert_eq!(h.get_match(a, b).unwrap().status, MatchStatus::Finished);
    }

    #[test]
    fn test_bisection_steps_are_ordered() {
        let h = Harness::new();
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        let parents = [[0x41; 32], [0x42; 32], [0x43; 32]];

        h.dispatch_all(&[
            tournament_created(TOP),
            commitment_joined(TOP, 0, a),
            commitment_joined(TOP, 0, b),
            match_created(TOP, 0, a, b),
        ]);
        for parent in parents {
            h.dispatch_all(&[match_advanced(TOP, 0, a, b, parent)]);
        }

        let steps = h
            .service
            .steps_for_match(&derive_match_id(&a, &b))
            .unwrap();
        let seen: Vec<_> = steps.iter().map(|s| s.parent).collect();
        assert_eq!(seen, parents.to_vec());
        assert!(steps.iter().all(|s| s.party == party_for(&a)));
    }

    #[test]
    fn test_bracket_advances_after_undecided_match() {
        let h = Harness::new();
        let (a, b, c) = (claim_root(0xA), claim_root(0xB), claim_root(0xC));

        h.dispatch_all(&[
            tournament_created(TOP),
            commitment_joined(TOP, 0, a),
            commitment_joined(TOP, 0, b),
            commitment_joined(TOP, 0, c),
            match_created(TOP, 0, a, b),
            match_deleted(TOP, 0, a, b),
        ]);
        assert_eq!(h.status(TOP, a), CommitmentStatus::Playing);
        assert_eq!(h.status(TOP, c), CommitmentStatus::Waiting);

        h.chain.set_arbitration_result(TOP, arbitration_won_by(&c));
        h.dispatch_all(&[match_created(TOP, 0, a, c), match_deleted(TOP, 0, a, c)]);

        assert_eq!(h.status(TOP, a), CommitmentStatus::Lost);
        assert_eq!(h.status(TOP, c), CommitmentStatus::Won);
        // The first pairing never produced a verdict.
        assert_eq!(h.status(TOP, b), CommitmentStatus::Playing);
        assert!(h.get_match(a, b).unwrap().resolution.is_none());
    }

    #[test]
    fn test_chain_outage_is_redelivered() {
        let h = Harness::new();
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        h.chain.set_arbitration_result(TOP, arbitration_won_by(&b));
        h.dispatch_all(&[
            tournament_created(TOP),
            commitment_joined(TOP, 0, a),
            commitment_joined(TOP, 0, b),
            match_created(TOP, 0, a, b),
        ]);
        let before = h.snapshot();

        h.chain.fail_next(1);
        let err = h.dispatch(&match_deleted(TOP, 0, a, b)).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(h.snapshot(), before);

        h.dispatch_all(&[match_deleted(TOP, 0, a, b)]);
        assert_eq!(h.status(TOP, a), CommitmentStatus::Lost);
        assert_eq!(h.status(TOP, b), CommitmentStatus::Won);
    }
}
