//! Core data structures for nanook (pure Rust)
//
// Dense, contiguous, row-major n-dimensional arrays over a small closed set
// of numeric dtypes, plus the tagged scalar type reductions return and the
// shared error enum. The kernel crate builds on these; this crate has no
// reduction logic of its own.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod array;
pub mod dtype;
pub mod error;

pub use array::{Buffer, Element, NdArray, Scalar};
pub use dtype::DType;
pub use error::Error;
