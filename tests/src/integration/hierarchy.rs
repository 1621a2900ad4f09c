//! # Tournament Hierarchy
//!
//! Inner tournaments, level ownership of reused addresses and depth
//! bounds.

#[cfg(test)]
mod tests {
    use shared_types::Address;
    use tournament_indexer::domain::derive_match_id;
    use tournament_indexer::test_utils::*;
    use tournament_indexer::{
        CommitmentStatus, DispatchOutcome, EngineError, IndexerConfig, TournamentQueryApi,
    };

    use crate::fixtures::Harness;

    const TOP: Address = [0x10; 20];
    const MID: Address = [0x20; 20];
    const BOTTOM: Address = [0x30; 20];

    /// Top match (a, b) sealed into MID; MID match (c, d) sealed into BOTTOM.
    fn three_levels(h: &Harness) {
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        let (c, d) = (claim_root(0xC), claim_root(0xD));
        h.dispatch_all(&[
            tournament_created(TOP),
            commitment_joined(TOP, 0, a),
            commitment_joined(TOP, 0, b),
            match_created(TOP, 0, a, b),
            new_inner_tournament(TOP, 0, a, b, MID),
            commitment_joined(MID, 1, c),
            commitment_joined(MID, 1, d),
            match_created(MID, 1, c, d),
            new_inner_tournament(MID, 1, c, d, BOTTOM),
        ]);
    }

    #[test]
    fn test_every_child_is_one_level_deeper() {
        let h = Harness::new();
        three_levels(&h);

        for (parent, child) in [(TOP, MID), (MID, BOTTOM)] {
            let parent_t = h.service.get_tournament(&parent).unwrap().unwrap();
            let child_t = h.service.get_tournament(&child).unwrap().unwrap();
            assert_eq!(child_t.level, parent_t.level + 1);
            assert_eq!(child_t.parent_tournament, Some(parent));

            let parent_match = h
                .service
                .get_match(&child_t.parent_match.unwrap())
                .unwrap()
                .unwrap();
            assert_eq!(parent_match.tournament, parent);
        }

        let children = h.service.child_tournaments(&TOP).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, MID);
        assert!(h.service.get_tournament(&TOP).unwrap().unwrap().parent_match.is_none());
    }

    #[test]
    fn test_bottom_match_resolved_by_inner_winner() {
        let h = Harness::new();
        three_levels(&h);
        let (e, f) = (claim_root(0xE), claim_root(0xF));
        h.chain.set_inner_winner(BOTTOM, inner_won_by(&f));

        h.dispatch_all(&[
            commitment_joined(BOTTOM, 2, e),
            commitment_joined(BOTTOM, 2, f),
            match_created(BOTTOM, 2, e, f),
            match_deleted(BOTTOM, 2, e, f),
        ]);

        assert_eq!(h.status(BOTTOM, e), CommitmentStatus::Lost);
        assert_eq!(h.status(BOTTOM, f), CommitmentStatus::Won);
        let verdict = h.get_match(e, f).unwrap().resolution.unwrap();
        assert_eq!(verdict.contested_node, Some(left_of(&f)));
        assert_eq!(verdict.winning_machine_hash, None);
        // Only the bottom tournament was queried.
        assert_eq!(h.chain.read_count(), 1);
    }

    #[test]
    fn test_address_owned_by_other_level_is_skipped() {
        let h = Harness::new();
        three_levels(&h);
        let before = h.snapshot();

        // MID is a level-1 tournament; the level-2 handler set must ignore it.
        let foreign = [
            commitment_joined(MID, 2, claim_root(0x77)),
            match_created(MID, 2, claim_root(0xC), claim_root(0xD)),
            match_deleted(MID, 2, claim_root(0xC), claim_root(0xD)),
        ];
        let outcomes = h.dispatch_all(&foreign);

        assert!(outcomes.iter().all(|o| *o == DispatchOutcome::Skipped));
        assert_eq!(h.snapshot(), before);
        assert_eq!(h.chain.read_count(), 0);
    }

    #[test]
    fn test_unknown_address_is_skipped_below_top() {
        let h = Harness::new();
        let stray: Address = [0x99; 20];
        let outcome = h.dispatch(&commitment_joined(stray, 1, claim_root(1))).unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped);
        assert!(h.service.get_tournament(&stray).unwrap().is_none());
    }

    #[test]
    fn test_child_address_reused_at_other_level_is_rejected() {
        let h = Harness::new();
        three_levels(&h);
        let (c, d) = (claim_root(0xC), claim_root(0xD));
        let (g, k) = (claim_root(0x61), claim_root(0x62));

        // BOTTOM is already a level-2 tournament; spawning it at level 1 conflicts.
        h.dispatch_all(&[match_created(TOP, 0, g, k)]);
        assert!(matches!(
            h.dispatch(&new_inner_tournament(TOP, 0, g, k, BOTTOM)),
            Err(EngineError::DuplicateEntity { .. })
        ));

        // Identical replay of the original creation is fine.
        h.dispatch_all(&[new_inner_tournament(MID, 1, c, d, BOTTOM)]);
        assert_eq!(h.service.get_tournament(&BOTTOM).unwrap().unwrap().level, 2);
    }

    #[test]
    fn test_inner_tournament_requires_parent_match_in_emitter() {
        let h = Harness::new();
        three_levels(&h);
        let (a, b) = (claim_root(0xA), claim_root(0xB));

        // (a, b) lives in TOP, not MID.
        assert!(matches!(
            h.dispatch(&new_inner_tournament(MID, 1, a, b, [0x40; 20])),
            Err(EngineError::MissingEntity { .. })
        ));
        assert!(h.service.get_match(&derive_match_id(&a, &b)).unwrap().is_some());
    }

    #[test]
    fn test_inner_tournament_cannot_touch_parent_level_match() {
        let h = Harness::new();
        three_levels(&h);
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        h.chain.set_inner_winner(MID, inner_won_by(&a));
        let before = h.snapshot();

        // (a, b) is owned by TOP; MID logs naming it must not reach it.
        assert!(matches!(
            h.dispatch(&match_advanced(MID, 1, a, b, [0x51; 32])),
            Err(EngineError::MissingEntity { .. })
        ));
        assert!(matches!(
            h.dispatch(&match_deleted(MID, 1, a, b)),
            Err(EngineError::MissingEntity { .. })
        ));

        assert_eq!(h.snapshot(), before);
        assert!(h.get_match(a, b).unwrap().is_open());
        assert_eq!(h.status(TOP, a), CommitmentStatus::Playing);
        assert_eq!(h.status(TOP, b), CommitmentStatus::Playing);
        assert_eq!(h.chain.read_count(), 0);
    }

    #[test]
    fn test_configured_depth_bound() {
        let h = Harness::with_config(IndexerConfig::with_max_depth(3));
        three_levels(&h);
        let (e, f) = (claim_root(0xE), claim_root(0xF));
        h.dispatch_all(&[match_created(BOTTOM, 2, e, f)]);

        assert!(matches!(
            h.dispatch(&new_inner_tournament(BOTTOM, 2, e, f, [0x40; 20])),
            Err(EngineError::DepthExceeded {
                level: 3,
                max_depth: 3
            })
        ));
    }
}
