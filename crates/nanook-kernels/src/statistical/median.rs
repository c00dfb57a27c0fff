//! Median reductions backed by the selection engine
//
// Both kernels copy the input into a private buffer before selecting, so
// caller data is never mutated. `median` assumes a NaN-free input: NaN
// never compares less or greater, so a NaN pivot stalls every partition
// scan and the result is unspecified. `nanmedian` compacts NaNs out first
// and is the variant to use when missing data may be present.

use crate::select::{compact_nans, median_inplace};
use num_traits::Float;

/// Exact median. NaN on empty input; unspecified if the input holds NaN.
#[must_use]
pub fn median<T: Float>(a: &[T]) -> T {
    let mut buf = a.to_vec();
    median_inplace(&mut buf)
}

/// Exact median of the non-NaN elements; NaN when the input is empty or
/// entirely NaN.
#[must_use]
pub fn nanmedian<T: Float>(a: &[T]) -> T {
    let mut buf = a.to_vec();
    let n = compact_nans(&mut buf);
    if n == 0 {
        return T::nan();
    }
    median_inplace(&mut buf[..n])
}
