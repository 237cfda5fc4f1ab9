//! Independent sources: fixed current injection and DC rail voltage (§4.3).

use nodal_core::{Component, PinRef, PinKind, Registration, Result, State};

/// Constant current flowing from `pins[0]` to `pins[1]`.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    current: f64,
    pins: [PinRef; 2],
}

impl CurrentSource {
    pub fn new(current: f64, pin0: PinRef, pin1: PinRef) -> Self {
        Self {
            current,
            pins: [pin0, pin1],
        }
    }
}

impl Component for CurrentSource {
    fn arity(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "current_source"
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        if pin_local_idx == 0 {
            -self.current
        } else {
            self.current
        }
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
}

/// Fixed DC voltage written into a static pin.
///
/// Writes `v` into its pin at every `update_steady_state` call rather than
/// participating in the Newton iteration — a static pin is never a solver
/// unknown, so there is no current/gradient contribution to report.
#[derive(Debug, Clone)]
pub struct DcVoltage {
    v: f64,
    pin: PinRef,
}

impl DcVoltage {
    pub fn new(v: f64, pin: PinRef) -> Self {
        Self { v, pin }
    }
}

impl Component for DcVoltage {
    fn arity(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "dc_voltage"
    }

    fn update_model(&self, _registration: &mut Registration) -> Result<()> {
        if self.pin.kind != PinKind::Static {
            return Err(nodal_core::Error::WrongPinKindForDcVoltage { kind: self.pin.kind });
        }
        Ok(())
    }

    fn update_steady_state(&mut self, state: &mut State, _dt: f64) {
        state.static_state[self.pin.index] = self.v;
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
}
