//! # Concurrent Dispatch
//!
//! Events for different tournaments run in parallel; events for one
//! tournament are serialized. The final view must match a sequential run.

#[cfg(test)]
mod tests {
    use shared_types::{Address, ChainEvent};
    use std::sync::Arc;
    use tournament_indexer::test_utils::*;
    use tournament_indexer::{CommitmentStatus, EventIngestionApi, TournamentQueryApi};

    use crate::fixtures::{Harness, MemoryService};

    const TOURNAMENTS: u8 = 8;

    fn tournament_events(address: Address) -> Vec<ChainEvent> {
        let (a, b) = (claim_root(0xA), claim_root(0xB));
        vec![
            tournament_created(address),
            commitment_joined(address, 0, a),
            commitment_joined(address, 0, b),
            match_created(address, 0, a, b),
            match_advanced(address, 0, a, b, [0x51; 32]),
            match_deleted(address, 0, a, b),
        ]
    }

    fn spawn_stream(
        service: &Arc<MemoryService>,
        events: Vec<ChainEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(service);
        tokio::task::spawn_blocking(move || {
            for event in &events {
                service.dispatch(event).expect("dispatch failed");
            }
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_tournaments_match_sequential_run() {
        let parallel = Harness::new();
        let sequential = Harness::new();
        let addresses: Vec<Address> = (1..=TOURNAMENTS).map(address).collect();
        for h in [&parallel, &sequential] {
            for addr in &addresses {
                h.chain
                    .set_arbitration_result(*addr, arbitration_won_by(&claim_root(0xA)));
            }
        }

        let handles: Vec<_> = addresses
            .iter()
            .map(|addr| spawn_stream(&parallel.service, tournament_events(*addr)))
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        for addr in &addresses {
            sequential.dispatch_all(&tournament_events(*addr));
        }

        for addr in &addresses {
            assert_eq!(parallel.status(*addr, claim_root(0xA)), CommitmentStatus::Won);
            assert_eq!(parallel.status(*addr, claim_root(0xB)), CommitmentStatus::Lost);
            assert_eq!(
                parallel.service.matches_for_tournament(addr).unwrap(),
                sequential.service.matches_for_tournament(addr).unwrap()
            );
        }
        assert_eq!(
            parallel.snapshot().steps.len(),
            sequential.snapshot().steps.len()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_streams_for_one_tournament() {
        let h = Harness::new();
        let addr = address(0x42);
        h.chain
            .set_arbitration_result(addr, arbitration_won_by(&claim_root(0xB)));

        // Setup first so every stream sees a known tournament.
        h.dispatch_all(&[tournament_created(addr)]);
        let events = tournament_events(addr);

        let handles: Vec<_> = (0..4)
            .map(|_| spawn_stream(&h.service, events.clone()))
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let reference = Harness::new();
        reference
            .chain
            .set_arbitration_result(addr, arbitration_won_by(&claim_root(0xB)));
        reference.dispatch_all(&events);

        assert_eq!(h.snapshot(), reference.snapshot());
    }
}
