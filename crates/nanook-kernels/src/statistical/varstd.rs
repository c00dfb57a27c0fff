//! Variance and standard deviation over non-NaN elements
//
// Two-pass population algorithm: first pass computes the mean of the
// present elements, second pass sums squared deviations from it. The
// degrees-of-freedom adjustment is fixed at 0, so any non-empty set of
// present elements produces a finite result and an all-NaN or empty input
// produces NaN.

use num_traits::Float;
use wide::{f64x4, CmpEq};

use crate::statistical::sums::chunk_sum_count;

/// Population variance (ddof = 0) of non-NaN elements; NaN if none.
#[must_use]
pub fn nanvar<T: Float>(a: &[T]) -> T {
    let mut asum = T::zero();
    let mut cnt = 0usize;
    for &ai in a {
        if !ai.is_nan() {
            asum = asum + ai;
            cnt += 1;
        }
    }
    if cnt == 0 {
        return T::nan();
    }
    let n = T::from(cnt).expect("non-NaN count is representable as a float");
    let amean = asum / n;
    let mut ssd = T::zero();
    for &ai in a {
        if !ai.is_nan() {
            let d = ai - amean;
            ssd = ssd + d * d;
        }
    }
    ssd / n
}

/// Population standard deviation (ddof = 0) of non-NaN elements; NaN if none.
#[must_use]
pub fn nanstd<T: Float>(a: &[T]) -> T {
    nanvar(a).sqrt()
}

/// Sum of squared deviations from `amean` over non-NaN elements, chunked.
#[must_use]
fn chunk_ssd(a: &[f64], amean: f64) -> f64 {
    let zero = f64x4::splat(0.0);
    let meanv = f64x4::splat(amean);
    let mut accv = zero;
    let mut i = 0usize;
    let limit4 = a.len() & !3;
    while i < limit4 {
        let v = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        let present = v.cmp_eq(v);
        let d = present.blend(v - meanv, zero);
        accv += d * d;
        i += 4;
    }
    let arr = accv.to_array();
    let mut ssd = arr[0] + arr[1] + arr[2] + arr[3];
    while i < a.len() {
        let x = a[i];
        if !x.is_nan() {
            let d = x - amean;
            ssd += d * d;
        }
        i += 1;
    }
    ssd
}

/// `nanvar` for f64 with 4-lane chunked passes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nanvar_f64(a: &[f64]) -> f64 {
    let (asum, cnt) = chunk_sum_count(a);
    if cnt == 0 {
        return f64::NAN;
    }
    let n = cnt as f64;
    chunk_ssd(a, asum / n) / n
}

/// `nanstd` for f64 with 4-lane chunked passes.
#[must_use]
pub fn nanstd_f64(a: &[f64]) -> f64 {
    nanvar_f64(a).sqrt()
}
