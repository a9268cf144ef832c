//! Criterion benchmarks for the simulation tick.
//!
//! Two benchmark groups:
//! - `not_ring`: a 101-gate NOT ring oscillator, every tick carries a
//!   wavefront -- measures steady propagation cost.
//! - `idle_tick`: a settled 200-chain circuit -- measures the empty-queue
//!   floor of a tick.

use criterion::{Criterion, criterion_group, criterion_main};
use gatework_core::engine::Simulation;
use gatework_core::geom::Point;
use gatework_core::test_utils::*;

/// Build `chains` parallel switch -> NOT -> probe chains and settle them.
fn build_settled_chains(chains: usize) -> Simulation {
    let mut sim = Simulation::new();
    for i in 0..chains {
        let y = i as i32 * 80;
        let sw = sim.add_gate(&switch_template(), Point::new(0, y));
        let not = sim.add_gate(&not_template(), Point::new(100, y));
        let probe = sim.add_gate(&probe_template(), Point::new(300, y));
        connect_pins(&mut sim, (sw, 0), (not, 0));
        connect_pins(&mut sim, (not, 1), (probe, 0));
    }
    drain(&mut sim);
    sim
}

fn bench_not_ring(c: &mut Criterion) {
    let mut sim = Simulation::new();
    build_not_ring(&mut sim, 101);

    c.bench_function("not_ring_101_tick", |b| {
        b.iter(|| sim.tick());
    });
}

fn bench_idle_tick(c: &mut Criterion) {
    let mut sim = build_settled_chains(200);

    c.bench_function("settled_200_chains_idle_tick", |b| {
        b.iter(|| sim.tick());
    });
}

criterion_group!(benches, bench_not_ring, bench_idle_tick);
criterion_main!(benches);
