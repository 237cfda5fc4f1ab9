//! Concrete circuit elements implementing `nodal_core::Component`.
//!
//! Passive two-terminals (resistor, capacitor, coil), nonlinear
//! semiconductors (diode, antiparallel diode pair, NPN/PNP BJT), independent
//! sources (current, DC voltage), and the two equation-override devices
//! (ideal op-amp, ideal voltage-controlled voltage source).

mod active_override;
mod bjt;
mod diode;
mod passive;
mod sources;
mod util;

pub use active_override::{OpAmp, VoltageGain};
pub use bjt::{BjtNpn, BjtPnp};
pub use diode::{AntiparallelDiodePair, Diode};
pub use passive::{Capacitor, Coil, Resistor, STEADY_STATE_CONDUCTANCE};
pub use sources::{CurrentSource, DcVoltage};
pub use util::{clamp_exp_arg, EXP_ARG_LIMIT};
