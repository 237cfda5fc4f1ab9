//! Pin references, state vectors, the `Component` contract and error types
//! shared by the nodal circuit solver.
//!
//! This crate has no solver logic of its own — it is the vocabulary
//! `nodal-devices` and `nodal-solver` build on, the same role
//! `spicier-core` plays for the MNA-matrix-based sibling project this one's
//! conventions are drawn from.

mod component;
mod error;
mod pin;
mod state;

pub use component::{Component, Registration};
pub use error::{Error, Result};
pub use pin::{ComponentId, PinKind, PinRef};
pub use state::State;
