//! The `Component` capability contract (§3) and the registration handle
//! components use to claim an equation override (§4.4, §9).

use crate::error::{Error, Result};
use crate::pin::{ComponentId, PinRef};
use crate::state::State;

/// Handle passed to [`Component::update_model`] at registration time.
///
/// Carries just enough context for a component to claim the
/// equation-override slot of one of its own dynamic pins, without holding a
/// reference to the model itself beyond registration (§9).
pub struct Registration<'a> {
    component_id: ComponentId,
    overrides: &'a mut [Option<(ComponentId, usize)>],
}

impl<'a> Registration<'a> {
    pub fn new(component_id: ComponentId, overrides: &'a mut [Option<(ComponentId, usize)>]) -> Self {
        Self {
            component_id,
            overrides,
        }
    }

    /// Claim the KCL-row-replacement equation `eq_number` for `pin`, which
    /// must be dynamic and must belong to the claiming component.
    ///
    /// Fails if another component already claimed that pin's equation.
    pub fn claim_equation(&mut self, pin: PinRef, eq_number: usize) -> Result<()> {
        if !pin.is_dynamic() {
            return Err(Error::OverrideRequiresDynamicPin { kind: pin.kind });
        }
        let slot = &mut self.overrides[pin.index];
        if let Some((existing, _)) = slot {
            return Err(Error::DuplicateOverride {
                pin: pin.index,
                existing: *existing,
                attempted: self.component_id,
            });
        }
        *slot = Some((self.component_id, eq_number));
        Ok(())
    }
}

/// The polymorphic contract every circuit element satisfies (§3).
///
/// Implementors hold their own parameters and pin list; the model never
/// reaches into a component's private state, only calls these methods with
/// borrowed state vectors.
pub trait Component: std::fmt::Debug {
    /// Number of pins this component expects, for arity validation at
    /// `add_component` time.
    fn arity(&self) -> usize;

    /// Device kind, for diagnostics and logging only (never parsed).
    fn name(&self) -> &'static str;

    /// Called once at registration. Components that replace a dynamic pin's
    /// KCL equation (ideal op-amp, voltage-gain source) claim that pin here.
    fn update_model(&self, _registration: &mut Registration) -> Result<()> {
        Ok(())
    }

    /// Cache any `dt`-dependent companion-model constants and initialize
    /// history. Called once before the first `solve(steady=true)` and again
    /// after it, per §4.7.
    ///
    /// Takes `&mut State` rather than `&State` because a DC voltage source
    /// writes its rail value into `static_state` here rather than
    /// participating in the Newton iteration.
    fn update_steady_state(&mut self, _state: &mut State, _dt: f64) {}

    /// Cache expensive per-iteration values (exponentials, diode currents)
    /// before each Newton iteration.
    fn precompute(&mut self, _state: &State, _steady: bool) {}

    /// Current flowing into the component at its `pin_local_idx`-th pin.
    fn get_current(&self, pin_local_idx: usize, state: &State, steady: bool) -> f64;

    /// ∂(current into `row_pin_local_idx`) / ∂(voltage at `col_pin_local_idx`).
    fn get_gradient(
        &self,
        row_pin_local_idx: usize,
        col_pin_local_idx: usize,
        state: &State,
        steady: bool,
    ) -> f64;

    /// For equation-override components only: replace the KCL row with a
    /// full `(residual, jacobian_row)` pair. The default panics — it must
    /// only be called on components that claimed an override in
    /// `update_model`.
    fn add_equation(&self, _state: &State, _steady: bool, _eq_number: usize) -> (f64, Vec<f64>) {
        unreachable!(
            "add_equation called on a component that never claimed an equation override"
        )
    }

    /// Post-convergence history update (companion models of reactives).
    fn update_state(&mut self, _state: &State) {}
}
