//! One-stop re-export of the pin/state vocabulary (`nodal-core`), the
//! concrete device set (`nodal-devices`) and the Newton solver
//! (`nodal-solver`), for callers who want the whole stack behind a single
//! dependency.

pub use nodal_core::{Component, ComponentId, Error, PinKind, PinRef, Registration, Result, State};
pub use nodal_devices::{
    clamp_exp_arg, AntiparallelDiodePair, BjtNpn, BjtPnp, Capacitor, Coil, CurrentSource,
    DcVoltage, Diode, OpAmp, Resistor, VoltageGain, EXP_ARG_LIMIT, STEADY_STATE_CONDUCTANCE,
};
pub use nodal_solver::{JacobianDiff, Model, SolveOutcome, SolverConfig};
