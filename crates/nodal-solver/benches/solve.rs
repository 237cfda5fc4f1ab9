//! Benchmarks for the per-sample Newton solve.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::DVector;
use nodal_core::PinRef;
use nodal_devices::{BjtNpn, Resistor};
use nodal_solver::Model;

fn npn_bias_model() -> Model {
    let base = PinRef::dynamic_pin(0);
    let collector = PinRef::dynamic_pin(1);
    let emitter = PinRef::dynamic_pin(2);

    let mut model = Model::new(2, 3, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = DVector::from_vec(vec![0.0, 5.0]);
    model
        .add_component(
            Box::new(Resistor::new(16670.0, PinRef::static_pin(1), base)),
            vec![PinRef::static_pin(1), base],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(1470.0, base, PinRef::static_pin(0))),
            vec![base, PinRef::static_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(1000.0, PinRef::static_pin(1), collector)),
            vec![PinRef::static_pin(1), collector],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(100.0, emitter, PinRef::static_pin(0))),
            vec![emitter, PinRef::static_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(BjtNpn::new(1e-12, 0.026, 100.0, 1.0, 1.0, base, collector, emitter)),
            vec![base, collector, emitter],
        )
        .unwrap();
    model
}

fn bench_setup(c: &mut Criterion) {
    c.bench_function("npn_bias_setup", |bencher| {
        bencher.iter(|| {
            let mut model = npn_bias_model();
            black_box(model.setup().unwrap());
        });
    });
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("npn_bias_step");
    group.bench_with_input(BenchmarkId::from_parameter("steady_state"), &(), |bencher, _| {
        let mut model = npn_bias_model();
        model.setup().unwrap();
        bencher.iter(|| black_box(model.step(&[]).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_setup, bench_step);
criterion_main!(benches);
