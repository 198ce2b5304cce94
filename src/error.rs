//! Recoverable errors. Broken graph invariants panic instead of showing up here.

/// Errors from comparing or validating vector clocks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Two clocks of different lengths were compared.
    #[error("vector clock dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A clock with no components.
    #[error("vector clock has no components")]
    Empty,
}

/// Errors from reading the textual clock format.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// `(` opened a label that was never closed.
    #[error("line {line}: unclosed label in {text:?}")]
    UnclosedLabel { line: usize, text: String },
    /// A component that is not a non-negative integer.
    #[error("line {line}: invalid clock component {component:?} in {text:?}")]
    InvalidComponent { line: usize, component: String, text: String },
    /// A line carrying a label but no components.
    #[error("line {line}: no clock components in {text:?}")]
    Empty { line: usize, text: String },
    #[error("line {line}: expected {expected} components, found {found}")]
    DimensionMismatch { line: usize, expected: usize, found: usize },
    #[error("invalid JSON clock list: {0}")]
    Json(#[from] serde_json::Error),
}
