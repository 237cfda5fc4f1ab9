//! Linear passive two-terminals: resistor, capacitor, coil (§4.1).

use nodal_core::{Component, State};

/// Linear resistor between `pins[0]` and `pins[1]`.
#[derive(Debug, Clone)]
pub struct Resistor {
    g: f64,
    pins: [nodal_core::PinRef; 2],
}

impl Resistor {
    pub fn new(r: f64, pin0: nodal_core::PinRef, pin1: nodal_core::PinRef) -> Self {
        Self {
            g: 1.0 / r,
            pins: [pin0, pin1],
        }
    }

    fn delta(&self, state: &State) -> f64 {
        state.voltage(self.pins[1]) - state.voltage(self.pins[0])
    }
}

impl Component for Resistor {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "resistor"
    }

    fn get_current(&self, pin_local_idx: usize, state: &State, _steady: bool) -> f64 {
        let sign = if pin_local_idx == 0 { 1.0 } else { -1.0 };
        self.delta(state) * self.g * sign
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        let row_sign = if row_pin_local_idx == 0 { 1.0 } else { -1.0 };
        let col_sign = if col_pin_local_idx == 1 { 1.0 } else { -1.0 };
        row_sign * col_sign * self.g
    }
}

/// Capacitor between `pins[0]` and `pins[1]`, trapezoidal companion model.
///
/// At steady state it behaves as an open circuit (zero current, zero
/// gradient). Otherwise its current is `g*Δ - ieq` where `g = 2C/dt` and
/// `ieq` is the history term refreshed in `update_state` after each sample
/// converges.
#[derive(Debug, Clone)]
pub struct Capacitor {
    c: f64,
    g: f64,
    ieq: f64,
    pins: [nodal_core::PinRef; 2],
}

impl Capacitor {
    pub fn new(c: f64, pin0: nodal_core::PinRef, pin1: nodal_core::PinRef) -> Self {
        Self {
            c,
            g: 0.0,
            ieq: 0.0,
            pins: [pin0, pin1],
        }
    }

    fn delta(&self, state: &State) -> f64 {
        state.voltage(self.pins[1]) - state.voltage(self.pins[0])
    }
}

impl Component for Capacitor {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "capacitor"
    }

    fn update_steady_state(&mut self, state: &mut State, dt: f64) {
        self.g = 2.0 * self.c / dt;
        self.ieq = self.g * self.delta(state);
    }

    fn get_current(&self, pin_local_idx: usize, state: &State, steady: bool) -> f64 {
        if steady {
            return 0.0;
        }
        let sign = if pin_local_idx == 0 { 1.0 } else { -1.0 };
        (self.delta(state) * self.g - self.ieq) * sign
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        steady: bool,
    ) -> f64 {
        if steady {
            return 0.0;
        }
        let row_sign = if row_pin_local_idx == 0 { 1.0 } else { -1.0 };
        let col_sign = if col_pin_local_idx == 1 { 1.0 } else { -1.0 };
        row_sign * col_sign * self.g
    }

    fn update_state(&mut self, state: &State) {
        self.ieq = 2.0 * self.g * self.delta(state) - self.ieq;
    }
}

/// Coil between `pins[0]` and `pins[1]`, trapezoidal companion model.
///
/// Maintains its own branch current `i` and a voltage-history term `veq`.
/// In steady state the coil is approximated as a short via a fixed large
/// conductance (`STEADY_STATE_CONDUCTANCE`) rather than adding a branch
/// current unknown (§9, explicitly out of scope for this engine).
#[derive(Debug, Clone)]
pub struct Coil {
    l: f64,
    l2t: f64,
    inv_l2t: f64,
    i: f64,
    veq: f64,
    pins: [nodal_core::PinRef; 2],
}

/// Conductance used to approximate an inductor short in steady state (§4.1, §9).
pub const STEADY_STATE_CONDUCTANCE: f64 = 1e6;

impl Coil {
    pub fn new(l: f64, pin0: nodal_core::PinRef, pin1: nodal_core::PinRef) -> Self {
        Self {
            l,
            l2t: 0.0,
            inv_l2t: 0.0,
            i: 0.0,
            veq: 0.0,
            pins: [pin0, pin1],
        }
    }

    fn delta(&self, state: &State) -> f64 {
        state.voltage(self.pins[1]) - state.voltage(self.pins[0])
    }
}

impl Component for Coil {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "coil"
    }

    fn update_steady_state(&mut self, _state: &mut State, dt: f64) {
        self.l2t = 2.0 * self.l / dt;
        self.inv_l2t = 1.0 / self.l2t;
        self.veq = self.l2t * self.i;
    }

    fn precompute(&mut self, state: &State, steady: bool) {
        self.i = if steady {
            self.delta(state) * STEADY_STATE_CONDUCTANCE
        } else {
            (self.delta(state) + self.veq) * self.inv_l2t
        };
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        let sign = if pin_local_idx == 0 { 1.0 } else { -1.0 };
        self.i * sign
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        steady: bool,
    ) -> f64 {
        let row_sign = if row_pin_local_idx == 0 { 1.0 } else { -1.0 };
        let col_sign = if col_pin_local_idx == 1 { 1.0 } else { -1.0 };
        let g = if steady {
            STEADY_STATE_CONDUCTANCE
        } else {
            self.inv_l2t
        };
        row_sign * col_sign * g
    }

    fn update_state(&mut self, _state: &State) {
        self.veq = 2.0 * self.l2t * self.i - self.veq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodal_core::PinRef;

    fn s(v0: f64, v1: f64) -> State {
        let mut state = State::new(2, 0, 0);
        state.static_state[0] = v0;
        state.static_state[1] = v1;
        state
    }

    #[test]
    fn resistor_divider_currents_balance() {
        // 100R between S0=0 and S1=5; current into pin0 should be negative (flowing out)
        let r = Resistor::new(100.0, PinRef::static_pin(0), PinRef::static_pin(1));
        let state = s(0.0, 5.0);
        let i0 = r.get_current(0, &state, false);
        let i1 = r.get_current(1, &state, false);
        assert!((i0 + i1).abs() < 1e-12);
        assert!((i0 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn resistor_gradient_matches_finite_difference() {
        let r = Resistor::new(200.0, PinRef::static_pin(0), PinRef::static_pin(1));
        let h = 1e-6;
        let base = s(0.0, 5.0);
        let mut bumped = base.clone();
        bumped.static_state[1] += h;

        let di0 = (r.get_current(0, &bumped, false) - r.get_current(0, &base, false)) / h;
        let analytic = r.get_gradient(0, 1, &base, false);
        assert!((di0 - analytic).abs() < 1e-6);
    }

    #[test]
    fn capacitor_is_open_in_steady_state() {
        let mut c = Capacitor::new(1e-3, PinRef::static_pin(0), PinRef::static_pin(1));
        let mut state = s(0.0, 1.0);
        c.update_steady_state(&mut state, 1e-3);
        assert_eq!(c.get_current(0, &state, true), 0.0);
        assert_eq!(c.get_gradient(0, 0, &state, true), 0.0);
    }

    #[test]
    fn coil_steady_state_uses_large_conductance() {
        let mut coil = Coil::new(1e-3, PinRef::static_pin(0), PinRef::static_pin(1));
        let mut state = s(0.0, 1.0);
        coil.update_steady_state(&mut state, 1e-3);
        coil.precompute(&state, true);
        assert!((coil.i - STEADY_STATE_CONDUCTANCE).abs() < 1e-6);
    }
}
