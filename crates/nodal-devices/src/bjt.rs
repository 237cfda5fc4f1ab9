//! NPN/PNP bipolar junction transistors: Ebers-Moll model (§4.2).

use nodal_core::{Component, PinRef, State};

use crate::util::clamp_exp_arg;

/// Base-current and collector-current partials shared by both polarities —
/// they differ only in which sign the exponential arguments carry.
fn ib(is: f64, bf: f64, br: f64, exp_vbe: f64, exp_vbc: f64) -> f64 {
    is * ((exp_vbe - 1.0) / bf + (exp_vbc - 1.0) / br)
}

fn ic(is: f64, br: f64, exp_vbe: f64, exp_vbc: f64) -> f64 {
    is * ((exp_vbe - exp_vbc) - (exp_vbc - 1.0) / br)
}

fn ib_vbe(is: f64, bf: f64, vt: f64, exp_vbe: f64) -> f64 {
    is * exp_vbe / vt / bf
}

fn ib_vbc(is: f64, br: f64, vt: f64, exp_vbc: f64) -> f64 {
    is * exp_vbc / vt / br
}

fn ic_vbe(is: f64, vt: f64, exp_vbe: f64) -> f64 {
    is * exp_vbe / vt
}

fn ic_vbc(is: f64, br: f64, vt: f64, exp_vbc: f64) -> f64 {
    -is * exp_vbc / vt - is * exp_vbc / vt / br
}

/// ∂(base,collector current) / ∂(base,collector,emitter voltage), shared
/// table between the two polarities — only the exponentials differ.
fn gradient(
    row: usize,
    col: usize,
    is: f64,
    bf: f64,
    br: f64,
    vt: f64,
    exp_vbe: f64,
    exp_vbc: f64,
) -> f64 {
    let ibe = ib_vbe(is, bf, vt, exp_vbe);
    let ibc = ib_vbc(is, br, vt, exp_vbc);
    let ice = ic_vbe(is, vt, exp_vbe);
    let icc = ic_vbc(is, br, vt, exp_vbc);
    match (row, col) {
        (0, 0) => -(ibc + ibe),
        (0, 1) => ibc,
        (0, 2) => ibe,
        (1, 0) => -(icc + ice),
        (1, 1) => icc,
        (1, 2) => ice,
        (2, 0) => ibe + ibc + ice + icc,
        (2, 1) => -(ibc + icc),
        (2, 2) => -(ibe + ice),
        _ => unreachable!("bjt has only 3 pins"),
    }
}

/// NPN transistor. `pins` are `[base, collector, emitter]`.
#[derive(Debug, Clone)]
pub struct BjtNpn {
    is: f64,
    vt: f64,
    bf: f64,
    br: f64,
    exp_vbe: f64,
    exp_vbc: f64,
    pins: [PinRef; 3],
}

impl BjtNpn {
    /// `ne` is folded into `vt` here, matching how the emission coefficient
    /// is applied once at construction rather than recomputed per call.
    pub fn new(
        is: f64,
        vt: f64,
        bf: f64,
        br: f64,
        ne: f64,
        base: PinRef,
        collector: PinRef,
        emitter: PinRef,
    ) -> Self {
        Self {
            is,
            vt: vt * ne,
            bf,
            br,
            exp_vbe: 1.0,
            exp_vbc: 1.0,
            pins: [base, collector, emitter],
        }
    }

    fn vbe(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[2])
    }

    fn vbc(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[1])
    }
}

impl Component for BjtNpn {
    fn arity(&self) -> usize {
        3
    }

    fn name(&self) -> &'static str {
        "bjt_npn"
    }

    fn precompute(&mut self, state: &State, _steady: bool) {
        self.exp_vbe = clamp_exp_arg(self.vbe(state) / self.vt).exp();
        self.exp_vbc = clamp_exp_arg(self.vbc(state) / self.vt).exp();
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        let ib = ib(self.is, self.bf, self.br, self.exp_vbe, self.exp_vbc);
        let ic = ic(self.is, self.br, self.exp_vbe, self.exp_vbc);
        match pin_local_idx {
            0 => -ib,
            1 => -ic,
            2 => ib + ic,
            _ => unreachable!("bjt has only 3 pins"),
        }
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        gradient(
            row_pin_local_idx,
            col_pin_local_idx,
            self.is,
            self.bf,
            self.br,
            self.vt,
            self.exp_vbe,
            self.exp_vbc,
        )
    }
}

/// PNP transistor. `pins` are `[base, collector, emitter]`.
#[derive(Debug, Clone)]
pub struct BjtPnp {
    is: f64,
    vt: f64,
    bf: f64,
    br: f64,
    exp_vbe: f64,
    exp_vbc: f64,
    pins: [PinRef; 3],
}

impl BjtPnp {
    pub fn new(
        is: f64,
        vt: f64,
        bf: f64,
        br: f64,
        base: PinRef,
        collector: PinRef,
        emitter: PinRef,
    ) -> Self {
        Self {
            is,
            vt,
            bf,
            br,
            exp_vbe: 1.0,
            exp_vbc: 1.0,
            pins: [base, collector, emitter],
        }
    }

    fn vbe(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[2])
    }

    fn vbc(&self, state: &State) -> f64 {
        state.voltage(self.pins[0]) - state.voltage(self.pins[1])
    }
}

impl Component for BjtPnp {
    fn arity(&self) -> usize {
        3
    }

    fn name(&self) -> &'static str {
        "bjt_pnp"
    }

    fn precompute(&mut self, state: &State, _steady: bool) {
        self.exp_vbe = clamp_exp_arg(-self.vbe(state) / self.vt).exp();
        self.exp_vbc = clamp_exp_arg(-self.vbc(state) / self.vt).exp();
    }

    fn get_current(&self, pin_local_idx: usize, _state: &State, _steady: bool) -> f64 {
        let ib = ib(self.is, self.bf, self.br, self.exp_vbe, self.exp_vbc);
        let ic = ic(self.is, self.br, self.exp_vbe, self.exp_vbc);
        match pin_local_idx {
            0 => ib,
            1 => ic,
            2 => -(ib + ic),
            _ => unreachable!("bjt has only 3 pins"),
        }
    }

    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        _state: &State,
        _steady: bool,
    ) -> f64 {
        gradient(
            row_pin_local_idx,
            col_pin_local_idx,
            self.is,
            self.bf,
            self.br,
            self.vt,
            self.exp_vbe,
            self.exp_vbc,
        )
    }
}
