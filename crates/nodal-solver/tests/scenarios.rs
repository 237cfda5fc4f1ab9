//! Closed-form and known-operating-point checks across the device set,
//! one scenario per circuit topology rather than per device.

use nodal_core::PinRef;
use nodal_devices::{BjtNpn, Capacitor, Coil, Diode, OpAmp, Resistor};
use nodal_solver::Model;

#[test]
fn resistive_divider_settles_to_the_ratio() {
    let mut model = Model::new(2, 1, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = nalgebra::DVector::from_vec(vec![0.0, 5.0]);
    model
        .add_component(
            Box::new(Resistor::new(100.0, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
            vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(200.0, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
            vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
        )
        .unwrap();

    let outcome = model.setup().unwrap();
    assert!(outcome.converged);
    assert!((model.dynamic_state()[0] - 5.0 / 3.0).abs() < 1e-6);
}

/// Series R from a stepped rail into the node, C from the node to ground.
/// Static pin 0 is held at 0 through `setup`, then jumped to 1 directly
/// (bypassing `setup`, which would otherwise restamp the capacitor's
/// steady-state history at the new rail value instead of driving a
/// transient through it).
#[test]
fn rc_lowpass_tracks_the_step_response() {
    let r = 1000.0;
    let c = 1e-3;
    let dt = 1e-3;
    let rc = r * c;

    let mut model = Model::new(2, 1, 0);
    model.set_dt(dt);
    model
        .add_component(
            Box::new(Resistor::new(r, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
            vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Capacitor::new(c, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
            vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
        )
        .unwrap();

    model.setup().unwrap();
    assert!((model.dynamic_state()[0]).abs() < 1e-9);

    model.static_state_mut()[0] = 1.0;

    // Trapezoidal integration centers each step on the interval midpoint, so
    // the discrete trajectory tracks the continuous exponential evaluated at
    // a half-sample offset, not at `i*dt` exactly.
    for i in 0..=1000 {
        model.step(&[]).unwrap();
        let expected = 1.0 - (-((i as f64) + 0.5) * dt / rc).exp();
        let got = model.dynamic_state()[0];
        assert!(
            (got - expected).abs() < 5e-4,
            "sample {i}: got {got}, expected {expected}"
        );
    }
}

/// Dual of the RC case: series L from the stepped rail, shunt R to ground.
/// `dt` is large relative to `L/R` here (the inductor settles within a
/// fraction of a sample at audio rate), so the tolerance is looser than the
/// RC case above.
#[test]
fn rl_lowpass_tracks_the_step_response() {
    let r = 1000.0;
    let l = 1e-3;
    let dt = 1.0 / 48000.0;
    let tau = l / r;

    let mut model = Model::new(2, 1, 0);
    model.set_dt(dt);
    model
        .add_component(
            Box::new(Coil::new(l, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
            vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(r, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
            vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
        )
        .unwrap();

    model.setup().unwrap();
    model.static_state_mut()[0] = 1.0;

    for i in 0..=200 {
        model.step(&[]).unwrap();
        let expected = 1.0 - (-((i as f64) + 0.5) * dt / tau).exp();
        let got = model.dynamic_state()[0];
        assert!(
            (got - expected).abs() < 5e-3,
            "sample {i}: got {got}, expected {expected}"
        );
    }
}

/// NPN common-emitter bias point: a 16670/1470 divider weakly forward-biases
/// the base, so both the collector and emitter sit close to their rails.
#[test]
fn npn_common_emitter_bias_point_matches_the_known_operating_point() {
    let base = PinRef::dynamic_pin(0);
    let collector = PinRef::dynamic_pin(1);
    let emitter = PinRef::dynamic_pin(2);

    let mut model = Model::new(2, 3, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = nalgebra::DVector::from_vec(vec![0.0, 5.0]);

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

    let outcome = model.setup().unwrap();
    assert!(outcome.converged);
    assert!((model.dynamic_state()[0] - 0.4051).abs() < 1e-3);
    assert!((model.dynamic_state()[1] - 4.9943).abs() < 1e-3);
    assert!((model.dynamic_state()[2] - 0.000577).abs() < 1e-4);
}

/// Forward-biased diode with a non-unity emission coefficient.
#[test]
fn forward_biased_diode_matches_the_known_operating_point() {
    let mut model = Model::new(2, 1, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = nalgebra::DVector::from_vec(vec![5.0, 0.0]);

    model
        .add_component(
            Box::new(Resistor::new(1000.0, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
            vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Diode::new(1e-14, 1.24, 0.026, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
            vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
        )
        .unwrap();

    let outcome = model.setup().unwrap();
    assert!(outcome.converged);
    assert!((model.dynamic_state()[0] - 0.8624).abs() < 1e-3);
}

/// Non-inverting op-amp, feedback divider gain of 2: V+ tied straight to the
/// +5 rail, equal feedback/ground resistors around V-.
#[test]
fn non_inverting_op_amp_doubles_the_rail() {
    let v_minus = PinRef::dynamic_pin(0);
    let v_out = PinRef::dynamic_pin(1);

    let mut model = Model::new(2, 2, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = nalgebra::DVector::from_vec(vec![0.0, 5.0]);

    model
        .add_component(
            Box::new(OpAmp::new(v_minus, PinRef::static_pin(1), v_out)),
            vec![v_minus, PinRef::static_pin(1), v_out],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(1000.0, PinRef::static_pin(0), v_minus)),
            vec![PinRef::static_pin(0), v_minus],
        )
        .unwrap();
    model
        .add_component(
            Box::new(Resistor::new(1000.0, v_out, v_minus)),
            vec![v_out, v_minus],
        )
        .unwrap();

    let outcome = model.setup().unwrap();
    assert!(outcome.converged);
    assert!((model.dynamic_state()[0] - 5.0).abs() < 1e-6);
    assert!((model.dynamic_state()[1] - 10.0).abs() < 1e-6);
}
