//! Shared error enum for array construction and kernel dispatch

use crate::dtype::DType;
use thiserror::Error;

/// Every failure the library reports.
///
/// All errors are synchronous and raised at the call that detects them; no
/// partial results are produced. Operations are pure functions of their
/// inputs, so a failed call fails identically on retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input dtype is not covered by the kernel's signature table.
    #[error("kernel `{kernel}` has no signature for dtype {found}")]
    TypeMismatch {
        kernel: &'static str,
        found: DType,
    },

    /// Element-count mismatch: array data vs. shape, or values vs. labels.
    #[error("length mismatch: expected {expected} elements, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// A reduction axis outside `[0, ndim)`.
    #[error("axis {axis} is out of range for a {ndim}-dimensional array")]
    IndexOutOfRange { axis: usize, ndim: usize },

    /// Raised by strict-policy kernels on empty or all-NaN input.
    #[error("{0}")]
    EmptyInput(&'static str),
}
