//! Diode and antiparallel diode pair: Shockley exponential models (§4.1).

use nodal_core::{Component, PinRef, State};

use crate::util::clamp_exp_arg;

/// Shockley diode between `pins[0]` (anode) and `pins[1]` (cathode).
#[derive(Debug, Clone)]
pub struct Diode {
    is: f64,
    n: f64,
    vt: f64,
    one_diode: f64,
    pins: [PinRef; 2],
}

impl Diode {
    pub fn new(is: f64, n: f64, vt: f64, pin0: PinRef, pin1: PinRef) -> Self {
        Self {
            is,
            n,
            vt,
            one_diode: 1.0,
            pins: [pin0, pin1],
        }
    }

    fn delta(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[1])
    }
}

impl Component for Diode {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "diode"
    }

    fn precompute(&mut self, state: &State, _steady: bool) {
        let arg = self.delta(state) / (self.n * self.vt);
        self.one_diode = clamp_exp_arg(arg).exp();
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        let row_sign = if pin_local_idx == 1 { 1.0 } else { -1.0 };
        row_sign * self.is * (self.one_diode - 1.0)
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        let row_sign = if row_pin_local_idx == 1 { 1.0 } else { -1.0 };
        let col_sign = if col_pin_local_idx == 0 { 1.0 } else { -1.0 };
        row_sign * col_sign * self.is * self.one_diode / (self.n * self.vt)
    }
}

/// Two Shockley diodes wired anode-to-cathode in opposite directions between
/// the same two pins, conducting for either polarity (§4.1).
#[derive(Debug, Clone)]
pub struct AntiparallelDiodePair {
    is: f64,
    n: f64,
    vt: f64,
    one_diode: f64,
    one_diode_inv: f64,
    pins: [PinRef; 2],
}

impl AntiparallelDiodePair {
    pub fn new(is: f64, n: f64, vt: f64, pin0: PinRef, pin1: PinRef) -> Self {
        Self {
            is,
            n,
            vt,
            one_diode: 1.0,
            one_diode_inv: 1.0,
            pins: [pin0, pin1],
        }
    }

    fn delta(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[1])
    }
}

impl Component for AntiparallelDiodePair {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "antiparallel_diode_pair"
    }

    fn precompute(&mut self, state: &State, _steady: bool) {
        let arg = self.delta(state) / (self.n * self.vt);
        self.one_diode = clamp_exp_arg(arg).exp();
        self.one_diode_inv = clamp_exp_arg(-arg).exp();
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        let row_sign = if pin_local_idx == 1 { 1.0 } else { -1.0 };
        row_sign * self.is * (self.one_diode - self.one_diode_inv)
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        let row_sign = if row_pin_local_idx == 1 { 1.0 } else { -1.0 };
        let col_sign = if col_pin_local_idx == 0 { 1.0 } else { -1.0 };
        row_sign * col_sign * self.is * (self.one_diode + self.one_diode_inv) / (self.n * self.vt)
    }
}
