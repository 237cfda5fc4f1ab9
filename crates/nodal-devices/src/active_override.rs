//! Equation-override devices: an ideal op-amp and an ideal voltage-controlled
//! voltage source, both modeled as a virtual short replacing the KCL row at
//! their output pin rather than a current contribution (§4.4).

use nodal_core::{Component, PinKind, PinRef, Registration, Result, State};

fn dynamic_contribution(jac: &mut [f64], pin: PinRef, coefficient: f64) {
    if pin.kind == PinKind::Dynamic {
        jac[pin.index] += coefficient;
    }
}

/// Ideal op-amp between `[v_minus, v_plus, v_out]`. Claims the KCL row at
/// `v_out` and replaces it with the virtual-short constraint `v_minus ==
/// v_plus`; draws zero current at every pin.
#[derive(Debug, Clone)]
pub struct OpAmp {
    pins: [PinRef; 3],
}

impl OpAmp {
    pub fn new(v_minus: PinRef, v_plus: PinRef, v_out: PinRef) -> Self {
        Self {
            pins: [v_minus, v_plus, v_out],
        }
    }
}

impl Component for OpAmp {
    fn arity(&self) -> usize {
        3
    }

    fn name(&self) -> &'static str {
        "op_amp"
    }

    fn update_model(&self, registration: &mut Registration) -> Result<()> {
        registration.claim_equation(self.pins[2], 0)
    }

    fn get_current(&self, _pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        0.0
    }

    fn get_gradient(
        &self,
        _row_pin_local_idx: usize,
        _col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        0.0
    }

    fn add_equation(&self, state: &State, _steady: bool, _eq_number: usize) -> (f64, Vec<f64>) {
        let residual = state.voltage(self.pins[0]) - state.voltage(self.pins[1]);
        let mut jac = vec![0.0; state.nb_dynamic()];
        dynamic_contribution(&mut jac, self.pins[0], 1.0);
        dynamic_contribution(&mut jac, self.pins[1], -1.0);
        (residual, jac)
    }
}

/// Ideal voltage-controlled voltage source between `[vi_plus, vi_minus,
/// vo_plus, vo_minus]`. Claims the KCL row at `vo_plus` and replaces it with
/// `gain * (vi_plus - vi_minus) == (vo_plus - vo_minus)`; draws zero current
/// at every pin.
#[derive(Debug, Clone)]
pub struct VoltageGain {
    gain: f64,
    pins: [PinRef; 4],
}

impl VoltageGain {
    pub fn new(gain: f64, vi_plus: PinRef, vi_minus: PinRef, vo_plus: PinRef, vo_minus: PinRef) -> Self {
        Self {
            gain,
            pins: [vi_plus, vi_minus, vo_plus, vo_minus],
        }
    }
}

impl Component for VoltageGain {
    fn arity(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "voltage_gain"
    }

    fn update_model(&self, registration: &mut Registration) -> Result<()> {
        registration.claim_equation(self.pins[2], 0)
    }

    fn get_current(&self, _pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        0.0
    }

    fn get_gradient(
        &self,
        _row_pin_local_idx: usize,
        _col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        0.0
    }

    fn add_equation(&self, state: &State, _steady: bool, _eq_number: usize) -> (f64, Vec<f64>) {
        let residual = self.gain * (state.voltage(self.pins[0]) - state.voltage(self.pins[1]))
            - (state.voltage(self.pins[2]) - state.voltage(self.pins[3]));
        let mut jac = vec![0.0; state.nb_dynamic()];
        dynamic_contribution(&mut jac, self.pins[0], self.gain);
        dynamic_contribution(&mut jac, self.pins[1], -self.gain);
        dynamic_contribution(&mut jac, self.pins[2], -1.0);
        dynamic_contribution(&mut jac, self.pins[3], 1.0);
        (residual, jac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_amp_residual_is_the_differential_input_voltage() {
        let amp = OpAmp::new(
            PinRef::dynamic_pin(0),
            PinRef::static_pin(0),
            PinRef::dynamic_pin(1),
        );
        let mut state = State::new(1, 2, 0);
        state.static_state[0] = 2.5;
        state.dynamic_state[0] = 2.4;
        let (residual, jac) = amp.add_equation(&state, false, 0);
        assert!((residual - (2.4 - 2.5)).abs() < 1e-12);
        assert_eq!(jac, vec![1.0, 0.0]);
    }

    #[test]
    fn op_amp_claims_its_output_pin() {
        let amp = OpAmp::new(
            PinRef::dynamic_pin(0),
            PinRef::static_pin(0),
            PinRef::dynamic_pin(1),
        );
        let mut overrides = vec![None, None];
        let mut registration = Registration::new(nodal_core::ComponentId(0), &mut overrides);
        assert!(amp.update_model(&mut registration).is_ok());
        assert_eq!(overrides[1], Some((nodal_core::ComponentId(0), 0)));
    }

    #[test]
    fn voltage_gain_doubles_the_differential_input() {
        let gain = VoltageGain::new(
            2.0,
            PinRef::dynamic_pin(0),
            PinRef::static_pin(0),
            PinRef::dynamic_pin(1),
            PinRef::static_pin(0),
        );
        let mut state = State::new(1, 2, 0);
        state.static_state[0] = 0.0;
        state.dynamic_state[0] = 2.5;
        state.dynamic_state[1] = 5.0;
        let (residual, _jac) = gain.add_equation(&state, false, 0);
        assert!(residual.abs() < 1e-12);
    }
}
