//! Small demo driver over the nodal circuit solver: a resistive divider, an
//! RC low-pass step response, a stiff bias network brought up through
//! `Model::setup_ramped` instead of a one-shot `setup`, and a four-stage
//! Moog transistor ladder filter driven sample-by-sample.

use std::f64::consts::PI;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nalgebra::DVector;
use nodal_core::PinRef;
use nodal_devices::{BjtNpn, Capacitor, CurrentSource, Resistor, VoltageGain};
use nodal_solver::Model;

#[derive(Parser)]
#[command(name = "nodal", about = "Run a handful of worked circuits through the nodal solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Two-resistor voltage divider, steady state only.
    Divider {
        #[arg(long, default_value_t = 1000.0)]
        r_top: f64,
        #[arg(long, default_value_t = 2000.0)]
        r_bottom: f64,
    },
    /// RC low-pass, step response sampled at the given rate.
    RcStep {
        #[arg(long, default_value_t = 1000.0)]
        r: f64,
        #[arg(long, default_value_t = 1e-6)]
        c: f64,
        #[arg(long, default_value_t = 48000.0)]
        sample_rate: f64,
        #[arg(long, default_value_t = 20)]
        samples: usize,
    },
    /// NPN common-emitter bias network, ramped up from zero instead of
    /// solved from a cold start.
    RampedBias {
        #[arg(long, default_value_t = 8)]
        ramp_steps: usize,
    },
    /// Four-stage Moog differential-pair transistor ladder filter, rails
    /// ramped up before a sine is driven through the feedback loop.
    MoogLadder {
        #[arg(long, default_value_t = 10)]
        ramp_steps: usize,
        #[arg(long, default_value_t = 100_000.0)]
        sample_rate: f64,
        #[arg(long, default_value_t = 50.0)]
        input_freq: f64,
        #[arg(long, default_value_t = 1.0)]
        input_amplitude: f64,
        #[arg(long, default_value_t = 50)]
        samples: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Divider { r_top, r_bottom } => run_divider(r_top, r_bottom),
        Command::RcStep { r, c, sample_rate, samples } => run_rc_step(r, c, sample_rate, samples),
        Command::RampedBias { ramp_steps } => run_ramped_bias(ramp_steps),
        Command::MoogLadder {
            ramp_steps,
            sample_rate,
            input_freq,
            input_amplitude,
            samples,
        } => run_moog_ladder(ramp_steps, sample_rate, input_freq, input_amplitude, samples),
    }
}

fn run_divider(r_top: f64, r_bottom: f64) -> Result<()> {
    let mut model = Model::new(2, 1, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = DVector::from_vec(vec![0.0, 5.0]);
    model.add_component(
        Box::new(Resistor::new(r_top, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
        vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
    )?;
    model.add_component(
        Box::new(Resistor::new(r_bottom, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
        vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
    )?;

    let outcome = model.setup()?;
    println!(
        "divider: converged={} iterations={} D0={:.6}",
        outcome.converged,
        outcome.iterations,
        model.dynamic_state()[0]
    );
    Ok(())
}

fn run_rc_step(r: f64, c: f64, sample_rate: f64, samples: usize) -> Result<()> {
    let dt = 1.0 / sample_rate;
    let mut model = Model::new(2, 1, 0);
    model.set_dt(dt);
    model.add_component(
        Box::new(Resistor::new(r, PinRef::static_pin(0), PinRef::dynamic_pin(0))),
        vec![PinRef::static_pin(0), PinRef::dynamic_pin(0)],
    )?;
    model.add_component(
        Box::new(Capacitor::new(c, PinRef::dynamic_pin(0), PinRef::static_pin(1))),
        vec![PinRef::dynamic_pin(0), PinRef::static_pin(1)],
    )?;

    model.setup()?;
    model.static_state_mut()[0] = 1.0;

    println!("rc_step: r={r} c={c} dt={dt:.6e}");
    for i in 0..samples {
        model.step(&[])?;
        println!("  sample {i:4}: D0={:.6}", model.dynamic_state()[0]);
    }
    Ok(())
}

fn run_ramped_bias(ramp_steps: usize) -> Result<()> {
    let base = PinRef::dynamic_pin(0);
    let collector = PinRef::dynamic_pin(1);
    let emitter = PinRef::dynamic_pin(2);

    let mut model = Model::new(2, 3, 0);
    model.set_dt(1e-3);
    *model.static_state_mut() = DVector::from_vec(vec![0.0, 5.0]);

    model.add_component(
        Box::new(Resistor::new(16670.0, PinRef::static_pin(1), base)),
        vec![PinRef::static_pin(1), base],
    )?;
    model.add_component(
        Box::new(Resistor::new(1470.0, base, PinRef::static_pin(0))),
        vec![base, PinRef::static_pin(0)],
    )?;
    model.add_component(
        Box::new(Resistor::new(1000.0, PinRef::static_pin(1), collector)),
        vec![PinRef::static_pin(1), collector],
    )?;
    model.add_component(
        Box::new(Resistor::new(100.0, emitter, PinRef::static_pin(0))),
        vec![emitter, PinRef::static_pin(0)],
    )?;
    model.add_component(
        Box::new(BjtNpn::new(1e-12, 0.026, 100.0, 1.0, 1.0, base, collector, emitter)),
        vec![base, collector, emitter],
    )?;

    let outcome = model.setup_ramped(ramp_steps)?;
    println!(
        "ramped_bias: converged={} base={:.6} collector={:.6} emitter={:.6}",
        outcome.converged,
        model.dynamic_state()[0],
        model.dynamic_state()[1],
        model.dynamic_state()[2],
    );
    Ok(())
}

/// Four-stage Moog ladder: an input long-tailed pair feeding four cascaded
/// differential stages (a capacitor plus a transistor pair apiece), a final
/// pair tied to the `v+` rail, a gain-3 output buffer, and a DC-blocked
/// resistive feedback path back into the pair's other input. The tail
/// current source stands in for the real exponential-converter bias stage,
/// same simplification the original circuit makes.
struct MoogLadder {
    model: Model,
    out: usize,
}

fn build_moog_ladder(dt: f64) -> Result<MoogLadder> {
    let in_minus = PinRef::dynamic_pin(0);
    let lt = PinRef::dynamic_pin(1);
    let s1_minus = PinRef::dynamic_pin(2);
    let s1_plus = PinRef::dynamic_pin(3);
    let s2_minus = PinRef::dynamic_pin(4);
    let s2_plus = PinRef::dynamic_pin(5);
    let s3_minus = PinRef::dynamic_pin(6);
    let s3_plus = PinRef::dynamic_pin(7);
    let s4_minus = PinRef::dynamic_pin(8);
    let s4_plus = PinRef::dynamic_pin(9);
    let out = PinRef::dynamic_pin(10);

    let ground = PinRef::static_pin(0);
    let v_plus = PinRef::static_pin(1);
    let s1b = PinRef::static_pin(2);
    let s2b = PinRef::static_pin(3);
    let s3b = PinRef::static_pin(4);
    let s4b = PinRef::static_pin(5);

    let in_plus = PinRef::input_pin(0);

    let mut model = Model::new(6, 11, 1);
    model.set_dt(dt);
    *model.static_state_mut() = DVector::from_vec(vec![0.0, 10.0, 3.0, 4.0, 5.0, 6.0]);

    const IS: f64 = 6.73e-15;
    const VT: f64 = 0.026;
    const BF: f64 = 416.4;
    const BR: f64 = 0.7374;
    const NE: f64 = 1.259;
    let npn = |base, collector, emitter| Box::new(BjtNpn::new(IS, VT, BF, BR, NE, base, collector, emitter));

    // Input long-tailed pair.
    model.add_component(npn(in_plus, s1_minus, lt), vec![in_plus, s1_minus, lt])?;
    model.add_component(npn(in_minus, s1_plus, lt), vec![in_minus, s1_plus, lt])?;

    // Four cascaded stages, each a capacitor across the rails plus a
    // differential pair referenced to the next bias rail down.
    let stages = [
        (s1_minus, s1_plus, s1b, s2_minus, s2_plus),
        (s2_minus, s2_plus, s2b, s3_minus, s3_plus),
        (s3_minus, s3_plus, s3b, s4_minus, s4_plus),
    ];
    for (lo, hi, bias, next_lo, next_hi) in stages {
        model.add_component(Box::new(Capacitor::new(47e-9, lo, hi)), vec![lo, hi])?;
        model.add_component(npn(bias, next_lo, lo), vec![bias, next_lo, lo])?;
        model.add_component(npn(bias, next_hi, hi), vec![bias, next_hi, hi])?;
    }
    model.add_component(Box::new(Capacitor::new(47e-9, s4_minus, s4_plus)), vec![s4_minus, s4_plus])?;
    model.add_component(npn(s4b, v_plus, s4_minus), vec![s4b, v_plus, s4_minus])?;
    model.add_component(npn(s4b, v_plus, s4_plus), vec![s4b, v_plus, s4_plus])?;

    // Output buffer: ideal gain-3 voltage-controlled voltage source reading
    // the last stage's differential voltage.
    model.add_component(
        Box::new(VoltageGain::new(3.0, s4_plus, s4_minus, out, ground)),
        vec![s4_plus, s4_minus, out, ground],
    )?;

    // DC-blocked resistive feedback into the pair's other input.
    model.add_component(Box::new(Capacitor::new(1e-6, out, in_minus)), vec![out, in_minus])?;
    model.add_component(Box::new(Resistor::new(3300.0, in_minus, ground)), vec![in_minus, ground])?;

    // Tail current sink, substituting for the real exponential converter.
    model.add_component(Box::new(CurrentSource::new(10e-6, lt, ground)), vec![lt, ground])?;

    Ok(MoogLadder { model, out: out.index })
}

fn run_moog_ladder(
    ramp_steps: usize,
    sample_rate: f64,
    input_freq: f64,
    input_amplitude: f64,
    samples: usize,
) -> Result<()> {
    let dt = 1.0 / sample_rate;
    let MoogLadder { mut model, out } = build_moog_ladder(dt)?;
    let outcome = model.setup_ramped(ramp_steps)?;
    println!("moog_ladder: bias point converged={} after ramp", outcome.converged);

    for i in 0..samples {
        let v = input_amplitude * (2.0 * PI * input_freq * (i as f64) * dt).sin();
        model.step(&[v])?;
        println!("  sample {i:4}: in={v:.6} out={:.6}", model.dynamic_state()[out]);
    }
    Ok(())
}
