//! Newton solver tuning knobs (§4.6), exposed as a builder so tests can
//! override them without touching the hot path.

/// Tunables for [`crate::Model::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance on the infinity norm of the residual and, after
    /// clamping, of the Newton step.
    pub eps: f64,
    /// Upper bound on Newton iterations per `solve` call.
    pub max_iter: usize,
    /// Per-iteration step is rescaled so its largest-magnitude component
    /// never exceeds this bound.
    pub step_clamp: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            eps: 1e-8,
            max_iter: 200,
            step_clamp: 1.0,
        }
    }
}

impl SolverConfig {
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_step_clamp(mut self, step_clamp: f64) -> Self {
        self.step_clamp = step_clamp;
        self
    }
}
