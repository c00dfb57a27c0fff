//! Flat-slice reduction kernels
//
// Each kernel consumes one read-only flattened slice and returns a single
// value. The axis dispatcher and the grouped engine feed these; they never
// see array shapes themselves.

pub mod logic;
pub mod median;
pub mod minmax;
pub mod sums;
pub mod varstd;
