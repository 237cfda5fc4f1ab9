//! The three parallel state vectors (§3: static, dynamic, input).

use nalgebra::DVector;

use crate::pin::{PinKind, PinRef};

/// Static, dynamic and input voltage vectors, indexed by `PinRef`.
///
/// `static_state` holds DC rail voltages set by the caller (read, never
/// written, by the solver). `dynamic_state` holds the Newton solver's
/// unknowns. `input_state` holds the per-sample external drivers,
/// overwritten wholesale at the start of each sample.
#[derive(Debug, Clone)]
pub struct State {
    pub static_state: DVector<f64>,
    pub dynamic_state: DVector<f64>,
    pub input_state: DVector<f64>,
}

impl State {
    pub fn new(nb_static: usize, nb_dynamic: usize, nb_input: usize) -> Self {
        Self {
            static_state: DVector::zeros(nb_static),
            dynamic_state: DVector::zeros(nb_dynamic),
            input_state: DVector::zeros(nb_input),
        }
    }

    /// Look up the voltage at a pin regardless of which vector it lives in.
    pub fn voltage(&self, pin: PinRef) -> f64 {
        match pin.kind {
            PinKind::Static => self.static_state[pin.index],
            PinKind::Dynamic => self.dynamic_state[pin.index],
            PinKind::Input => self.input_state[pin.index],
        }
    }

    pub fn nb_static(&self) -> usize {
        self.static_state.len()
    }

    pub fn nb_dynamic(&self) -> usize {
        self.dynamic_state.len()
    }

    pub fn nb_input(&self) -> usize {
        self.input_state.len()
    }
}
