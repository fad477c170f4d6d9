//! Crate-wide error type.
//!
//! Every failure kind named by the data model carries the component name,
//! the operation name and the offending values, so that a caller several
//! layers up can print a useful diagnostic without re-deriving context.

use thiserror::Error as ThisError;

/// Catch-all error for this crate.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Two [`crate::xy::Xy`] series were combined pointwise but their
    /// abscissae are not compatible (different length, or some `x_i`
    /// differs by more than the tolerance).
    #[error("{component}::{operation}: domain mismatch ({detail})")]
    DomainMismatch {
        /// Component reporting the error (e.g. `"Xy"`).
        component: &'static str,
        /// Operation that was attempted (e.g. `"add_assign"`).
        operation: &'static str,
        /// Human-readable detail, e.g. the first mismatched index/x pair.
        detail: String,
    },
    /// A transform, histogram reduction, or additive-correction update
    /// was given data with the wrong number of points or spacing.
    #[error("{component}::{operation}: shape error ({detail})")]
    ShapeError {
        /// Component reporting the error.
        component: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// Human-readable detail.
        detail: String,
    },
    /// An index or coordinate fell outside a declared bound.
    #[error("{component}::{operation}: out of range ({detail})")]
    OutOfRange {
        /// Component reporting the error.
        component: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// Human-readable detail.
        detail: String,
    },
    /// A named entity (atom type, fit variable) could not be resolved.
    #[error("{component}::{operation}: unresolved reference '{name}'")]
    Unresolved {
        /// Component reporting the error.
        component: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// The name that could not be resolved.
        name: String,
    },
    /// A numerical routine produced a non-finite value, or an error
    /// metric had too few qualifying points to be meaningful.
    #[error("{component}::{operation}: numeric failure ({detail})")]
    NumericFailure {
        /// Component reporting the error.
        component: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// Human-readable detail.
        detail: String,
    },
    /// Tabular data could not be parsed.
    #[error("{component}::{operation}: parse error at line {line} ({detail})")]
    ParseError {
        /// Component reporting the error.
        component: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// One-based line number of the offending line.
        line: usize,
        /// Human-readable detail.
        detail: String,
    },
}

/// Convenience alias for this crate's `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
