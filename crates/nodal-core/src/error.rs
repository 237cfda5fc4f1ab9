//! Construction and solve-time errors (§7).

use thiserror::Error;

use crate::pin::{ComponentId, PinKind};

/// Errors the model can return.
///
/// Non-convergence is deliberately *not* a variant here: per §7, the solver
/// accepts the best iterate after `MAX_ITER` and reports that through a
/// `converged` flag on its solve outcome, not as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A component's pin list referenced a pin past the end of its kind's vector.
    #[error("pin {index} of kind {kind:?} is out of range (have {len})")]
    PinOutOfRange {
        kind: PinKind,
        index: usize,
        len: usize,
    },

    /// Two components tried to claim the equation-override slot of the same dynamic pin.
    #[error(
        "dynamic pin {pin} already has an equation override from component {existing}, cannot also claim it for component {attempted}"
    )]
    DuplicateOverride {
        pin: usize,
        existing: ComponentId,
        attempted: ComponentId,
    },

    /// A DC voltage was attached to a non-static pin.
    #[error("DC voltage source must target a static pin, got {kind:?}")]
    WrongPinKindForDcVoltage { kind: PinKind },

    /// A component tried to claim an equation override on a non-dynamic pin.
    #[error("equation override can only target a dynamic pin, got {kind:?}")]
    OverrideRequiresDynamicPin { kind: PinKind },

    /// A component was given the wrong number of pins for its declared arity.
    #[error("component {component} declares arity {expected} but was given {actual} pins")]
    ArityMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `setup()` was called before `dt` was set to a nonzero value.
    #[error("dt must be set to a nonzero value before setup()")]
    DtNotSet,

    /// The dense Newton step's Jacobian was singular.
    #[error("singular Jacobian at iteration {iteration} (residual norm {residual_norm:.3e})")]
    SingularJacobian { iteration: usize, residual_norm: f64 },

    /// A vector/matrix passed between layers had the wrong length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
