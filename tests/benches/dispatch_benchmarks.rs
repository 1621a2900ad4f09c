//! # Dispatch Benchmarks
//!
//! | Flow | Measures |
//! |------|----------|
//! | `full_bracket` | Joins, pairings, steps and resolutions for one tournament |
//! | `replay` | The same stream delivered a second time (all no-ops) |
//! | `calldata` | `joinTournament` decoding with growing proofs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::ChainEvent;
use std::sync::Arc;
use tournament_indexer::adapters::{InMemoryEntityStore, StaticChainReader};
use tournament_indexer::domain::JoinTournamentCall;
use tournament_indexer::test_utils::*;
use tournament_indexer::{EventIngestionApi, IndexerConfig, IndexerService};

const TOP: [u8; 20] = [0x10; 20];

/// Claims paired (0, 1), (2, 3), ... each with `steps` bisections.
fn bracket(claims: u8, steps: u8) -> Vec<ChainEvent> {
    let mut events = vec![tournament_created(TOP)];
    for i in 0..claims {
        events.push(commitment_joined(TOP, 0, claim_root(i)));
    }
    for pair in (0..claims).step_by(2) {
        let (one, two) = (claim_root(pair), claim_root(pair + 1));
        events.push(match_created(TOP, 0, one, two));
        for s in 0..steps {
            events.push(match_advanced(TOP, 0, one, two, [s; 32]));
        }
        events.push(match_deleted(TOP, 0, one, two));
    }
    events
}

fn service() -> IndexerService<InMemoryEntityStore, StaticChainReader> {
    let chain = StaticChainReader::new();
    chain.set_arbitration_result(TOP, arbitration_won_by(&claim_root(0)));
    IndexerService::new(
        IndexerConfig::default(),
        Arc::new(InMemoryEntityStore::new()),
        Arc::new(chain),
    )
}

fn bench_full_bracket(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for claims in [8u8, 32, 128] {
        let events = bracket(claims, 16);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::new("full_bracket", claims), &events, |b, events| {
            b.iter(|| {
                let service = service();
                for event in events {
                    black_box(service.dispatch(event).unwrap());
                }
            })
        });

        let warmed = service();
        for event in &events {
            warmed.dispatch(event).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("replay", claims), &events, |b, events| {
            b.iter(|| {
                for event in events {
                    black_box(warmed.dispatch(event).unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_calldata(c: &mut Criterion) {
    let mut group = c.benchmark_group("calldata");

    for depth in [4usize, 32, 64] {
        let mut call = join_call(&claim_root(1));
        call.proof = (0..depth).map(|i| [i as u8; 32]).collect();
        let input = call.encode();

        group.bench_with_input(BenchmarkId::new("join_tournament", depth), &input, |b, input| {
            b.iter(|| black_box(JoinTournamentCall::decode(input).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_bracket, bench_calldata);
criterion_main!(benches);
