//! Missing-data predicates and counting: allnan / anynan / count

use num_traits::Float;
use wide::{f64x4, CmpEq};

/// True iff every element is NaN. Vacuously true on empty input.
#[inline]
#[must_use]
pub fn allnan<T: Float>(a: &[T]) -> bool {
    a.iter().all(|x| x.is_nan())
}

/// True iff at least one element is NaN. False on empty input.
#[inline]
#[must_use]
pub fn anynan<T: Float>(a: &[T]) -> bool {
    a.iter().any(|x| x.is_nan())
}

/// Number of non-NaN elements.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn count<T: Float>(a: &[T]) -> i64 {
    a.iter().filter(|x| !x.is_nan()).count() as i64
}

/// `count` for f64 with 4-lane chunked accumulation.
///
/// Valid lanes are counted by accumulating a blended vector of ones, so the
/// count stays exact for any slice shorter than 2^53 elements.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn count_f64(a: &[f64]) -> i64 {
    let zero = f64x4::splat(0.0);
    let ones = f64x4::splat(1.0);
    let mut cntv = zero;
    let mut i = 0usize;
    let limit4 = a.len() & !3;
    while i < limit4 {
        let v = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        // NaN is the only value that compares unequal to itself
        let present = v.cmp_eq(v);
        cntv += present.blend(ones, zero);
        i += 4;
    }
    let arr = cntv.to_array();
    let mut cnt = (arr[0] + arr[1] + arr[2] + arr[3]) as i64;
    while i < a.len() {
        if !a[i].is_nan() {
            cnt += 1;
        }
        i += 1;
    }
    cnt
}
