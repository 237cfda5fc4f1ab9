//! Pin references: the tagged `(kind, index)` pairs components wire into.

/// Which of the three state vectors a pin lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKind {
    /// DC rail voltage, set by the caller, never mutated by the solver.
    Static,
    /// Solver unknown, mutated only by `solve`.
    Dynamic,
    /// Per-sample external driver, overwritten wholesale each `step`.
    Input,
}

/// A pin reference: a kind plus a zero-based index within that kind's vector.
///
/// Immutable after component construction — components store these in their
/// pin list and never rewrite them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinRef {
    pub kind: PinKind,
    pub index: usize,
}

impl PinRef {
    pub fn new(kind: PinKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn static_pin(index: usize) -> Self {
        Self::new(PinKind::Static, index)
    }

    pub fn dynamic_pin(index: usize) -> Self {
        Self::new(PinKind::Dynamic, index)
    }

    pub fn input_pin(index: usize) -> Self {
        Self::new(PinKind::Input, index)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, PinKind::Dynamic)
    }
}

/// Index of a component within a model's component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub usize);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
