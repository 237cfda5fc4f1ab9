//! The equation assembler, Newton solver, steady-state bootstrap and
//! numerical-Jacobian checker (§4.5-§4.9), tied together behind the `Model`
//! facade callers drive one sample at a time.

use indexmap::IndexMap;
use nalgebra::{DMatrix, DVector};
use nodal_core::{Component, ComponentId, Error, PinKind, PinRef, Registration, Result, State};

use crate::config::SolverConfig;

fn inf_norm(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Result of one `solve` call: whether it converged, how many iterations it
/// took, and the residual norm at the returned iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOutcome {
    pub converged: bool,
    pub iterations: usize,
    pub residual_norm: f64,
}

/// Analytic vs finite-difference Jacobian, for the `1e-4` relative-error
/// property tests assert against (§4.9).
#[derive(Debug, Clone)]
pub struct JacobianDiff {
    pub analytic: DMatrix<f64>,
    pub numerical: DMatrix<f64>,
}

impl JacobianDiff {
    /// Elementwise `|analytic - numerical| / (1 + |analytic|)`.
    pub fn max_relative_error(&self) -> f64 {
        let mut max = 0.0_f64;
        for (a, n) in self.analytic.iter().zip(self.numerical.iter()) {
            let rel = (a - n).abs() / (1.0 + a.abs());
            max = max.max(rel);
        }
        max
    }
}

/// Owns the pin/state vectors, the component list and its pin-incidence
/// table, and drives the Newton solve one sample at a time.
pub struct Model {
    components: Vec<Box<dyn Component>>,
    component_pins: Vec<Vec<PinRef>>,
    pin_incidence: IndexMap<PinRef, Vec<(ComponentId, usize)>>,
    overrides: Vec<Option<(ComponentId, usize)>>,
    state: State,
    dt: f64,
    initialized: bool,
    config: SolverConfig,
}

impl Model {
    pub fn new(nb_static: usize, nb_dynamic: usize, nb_input: usize) -> Self {
        Self::with_config(nb_static, nb_dynamic, nb_input, SolverConfig::default())
    }

    pub fn with_config(
        nb_static: usize,
        nb_dynamic: usize,
        nb_input: usize,
        config: SolverConfig,
    ) -> Self {
        Self {
            components: Vec::new(),
            component_pins: Vec::new(),
            pin_incidence: IndexMap::new(),
            overrides: vec![None; nb_dynamic],
            state: State::new(nb_static, nb_dynamic, nb_input),
            dt: 0.0,
            initialized: false,
            config,
        }
    }

    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Direct access to the static rail vector, for callers driving a
    /// ramped-rail bootstrap (§4.7 paragraph 2) without going through a
    /// `DcVoltage` component — a `DcVoltage` attached to the same pin would
    /// overwrite the ramped value the next time `setup` runs.
    pub fn static_state_mut(&mut self) -> &mut DVector<f64> {
        &mut self.state.static_state
    }

    pub fn dynamic_state(&self) -> &DVector<f64> {
        &self.state.dynamic_state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Register a component on the given pins, validating arity and pin
    /// ranges and letting the component claim an equation override.
    pub fn add_component(
        &mut self,
        component: Box<dyn Component>,
        pins: Vec<PinRef>,
    ) -> Result<ComponentId> {
        if pins.len() != component.arity() {
            return Err(Error::ArityMismatch {
                component: component.name(),
                expected: component.arity(),
                actual: pins.len(),
            });
        }
        for pin in &pins {
            let len = match pin.kind {
                PinKind::Static => self.state.nb_static(),
                PinKind::Dynamic => self.state.nb_dynamic(),
                PinKind::Input => self.state.nb_input(),
            };
            if pin.index >= len {
                return Err(Error::PinOutOfRange {
                    kind: pin.kind,
                    index: pin.index,
                    len,
                });
            }
        }

        let id = ComponentId(self.components.len());
        {
            let mut registration = Registration::new(id, &mut self.overrides);
            component.update_model(&mut registration)?;
        }
        for (local_idx, pin) in pins.iter().enumerate() {
            self.pin_incidence.entry(*pin).or_default().push((id, local_idx));
        }
        self.components.push(component);
        self.component_pins.push(pins);
        Ok(id)
    }

    fn assemble(&self, steady: bool) -> (DVector<f64>, DMatrix<f64>) {
        let n = self.state.nb_dynamic();
        let mut r = DVector::zeros(n);
        let mut j = DMatrix::zeros(n, n);
        for i in 0..n {
            if let Some((comp_id, eq_number)) = self.overrides[i] {
                let (residual, jac) =
                    self.components[comp_id.0].add_equation(&self.state, steady, eq_number);
                r[i] = residual;
                for (col, value) in jac.into_iter().enumerate() {
                    j[(i, col)] = value;
                }
                continue;
            }
            let pin = PinRef::dynamic_pin(i);
            let Some(incident) = self.pin_incidence.get(&pin) else {
                continue;
            };
            for &(comp_id, local_idx) in incident {
                let comp = self.components[comp_id.0].as_ref();
                r[i] += comp.get_current(local_idx, &self.state, steady);
                for (col_local_idx, col_pin) in self.component_pins[comp_id.0].iter().enumerate() {
                    if col_pin.is_dynamic() {
                        j[(i, col_pin.index)] +=
                            comp.get_gradient(local_idx, col_local_idx, &self.state, steady);
                    }
                }
            }
        }
        (r, j)
    }

    /// Newton iteration (§4.6). Accepts the best iterate after
    /// `config.max_iter` rounds rather than erroring — non-convergence is
    /// reported through `SolveOutcome::converged`, not `Err`.
    pub fn solve(&mut self, steady: bool) -> Result<SolveOutcome> {
        let mut last_residual_norm = f64::INFINITY;
        for iteration in 0..self.config.max_iter {
            for comp in self.components.iter_mut() {
                comp.precompute(&self.state, steady);
            }
            let (r, j) = self.assemble(steady);
            let residual_norm = inf_norm(&r);
            last_residual_norm = residual_norm;
            if residual_norm < self.config.eps {
                return Ok(SolveOutcome {
                    converged: true,
                    iterations: iteration,
                    residual_norm,
                });
            }

            let mut delta = j.lu().solve(&r).ok_or(Error::SingularJacobian {
                iteration,
                residual_norm,
            })?;
            let max_delta = inf_norm(&delta);
            if max_delta > self.config.step_clamp {
                let clamp_factor = self.config.step_clamp / max_delta;
                log::trace!(
                    "iteration {iteration}: clamping step by {clamp_factor:.3e} (|delta|={max_delta:.3e})"
                );
                delta *= clamp_factor;
            }
            if inf_norm(&delta) < self.config.eps {
                return Ok(SolveOutcome {
                    converged: true,
                    iterations: iteration,
                    residual_norm,
                });
            }

            self.state.dynamic_state -= &delta;
        }

        log::warn!(
            "Newton solve did not converge after {} iterations (residual: {:.3e})",
            self.config.max_iter,
            last_residual_norm
        );
        Ok(SolveOutcome {
            converged: false,
            iterations: self.config.max_iter,
            residual_norm: last_residual_norm,
        })
    }

    /// Steady-state bootstrap (§4.7): write rail voltages and reactive
    /// history, solve once with reactives as opens/near-shorts, then
    /// refresh history at the converged operating point.
    pub fn setup(&mut self) -> Result<SolveOutcome> {
        if self.dt == 0.0 {
            return Err(Error::DtNotSet);
        }
        for comp in self.components.iter_mut() {
            comp.update_steady_state(&mut self.state, self.dt);
        }
        let outcome = self.solve(true)?;
        for comp in self.components.iter_mut() {
            comp.update_steady_state(&mut self.state, self.dt);
        }
        self.initialized = true;
        log::debug!("setup() converged={} residual={:.3e}", outcome.converged, outcome.residual_norm);
        Ok(outcome)
    }

    /// Convenience for stiff circuits that don't converge from a zero
    /// initial guess (§4.7 paragraph 2): ramps the current static rails from
    /// zero to their set value across `steps` calls to `setup`, keeping
    /// `dynamic_state` as a warm start between ramp steps.
    pub fn setup_ramped(&mut self, steps: usize) -> Result<SolveOutcome> {
        let steps = steps.max(1);
        let target = self.state.static_state.clone();
        let mut outcome = None;
        for i in 1..=steps {
            let frac = i as f64 / steps as f64;
            self.state.static_state = &target * frac;
            outcome = Some(self.setup()?);
        }
        Ok(outcome.expect("steps is at least 1"))
    }

    /// Per-sample step (§4.8): drive `input`, solve at fixed rails/history,
    /// then refresh reactive history from the converged voltages.
    pub fn step(&mut self, input: &[f64]) -> Result<&DVector<f64>> {
        if !self.initialized {
            self.setup()?;
        }
        if input.len() != self.state.nb_input() {
            return Err(Error::DimensionMismatch {
                expected: self.state.nb_input(),
                actual: input.len(),
            });
        }
        self.state.input_state.copy_from_slice(input);
        self.solve(false)?;
        for comp in self.components.iter_mut() {
            comp.update_state(&self.state);
        }
        Ok(&self.state.dynamic_state)
    }

    /// Numerical-Jacobian checker (§4.9): perturbs each dynamic pin by `h`
    /// and compares the resulting finite-difference Jacobian against the
    /// analytic one. A diagnostic, never called from `solve`.
    pub fn check_jacobian(&mut self, steady: bool, h: f64) -> JacobianDiff {
        for comp in self.components.iter_mut() {
            comp.precompute(&self.state, steady);
        }
        let (base_r, analytic) = self.assemble(steady);
        let n = self.state.nb_dynamic();
        let mut numerical = DMatrix::zeros(n, n);
        for col in 0..n {
            let saved = self.state.dynamic_state[col];
            self.state.dynamic_state[col] = saved + h;
            for comp in self.components.iter_mut() {
                comp.precompute(&self.state, steady);
            }
            let (bumped_r, _) = self.assemble(steady);
            for row in 0..n {
                numerical[(row, col)] = (bumped_r[row] - base_r[row]) / h;
            }
            self.state.dynamic_state[col] = saved;
        }
        for comp in self.components.iter_mut() {
            comp.precompute(&self.state, steady);
        }
        JacobianDiff { analytic, numerical }
    }
}
