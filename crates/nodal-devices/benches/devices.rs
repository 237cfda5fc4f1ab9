//! Benchmarks for per-device current/gradient evaluation, the hot path the
//! Newton loop calls once per component per iteration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nodal_core::{Component, PinRef, State};
use nodal_devices::{BjtNpn, Diode, Resistor};

fn bench_resistor(c: &mut Criterion) {
    let r = Resistor::new(1000.0, PinRef::static_pin(0), PinRef::static_pin(1));
    let mut state = State::new(2, 0, 0);
    state.static_state[0] = 0.0;
    state.static_state[1] = 5.0;

    c.bench_function("resistor_current_and_gradient", |bencher| {
        bencher.iter(|| {
            let i0 = r.get_current(black_box(0), &state, false);
            let g = r.get_gradient(black_box(0), black_box(1), &state, false);
            black_box((i0, g))
        });
    });
}

fn bench_diode(c: &mut Criterion) {
    let mut d = Diode::new(1e-14, 1.24, 0.026, PinRef::static_pin(0), PinRef::static_pin(1));
    let mut state = State::new(2, 0, 0);
    state.static_state[0] = 0.6;
    state.static_state[1] = 0.0;

    c.bench_function("diode_precompute_and_current", |bencher| {
        bencher.iter(|| {
            d.precompute(&state, false);
            black_box(d.get_current(1, &state, false));
            black_box(d.get_gradient(1, 0, &state, false));
        });
    });
    black_box(&mut state);
}

fn bench_bjt_npn(c: &mut Criterion) {
    let mut q = BjtNpn::new(
        1e-14,
        0.026,
        100.0,
        1.0,
        1.0,
        PinRef::static_pin(0),
        PinRef::static_pin(1),
        PinRef::static_pin(2),
    );
    let mut state = State::new(3, 0, 0);
    state.static_state[0] = 0.7;
    state.static_state[1] = 5.0;
    state.static_state[2] = 0.0;

    c.bench_function("bjt_npn_precompute_and_gradient_table", |bencher| {
        bencher.iter(|| {
            q.precompute(&state, false);
            for row in 0..3 {
                for col in 0..3 {
                    black_box(q.get_gradient(row, col, &state, false));
                }
            }
        });
    });
}

criterion_group!(benches, bench_resistor, bench_diode, bench_bjt_npn);
criterion_main!(benches);
