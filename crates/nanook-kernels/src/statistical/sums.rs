//! Sum and mean reductions over non-NaN elements
//
// The f64 variants accumulate in 4-lane chunks with a scalar tail, masking
// NaN lanes to zero before the add. Chunked accumulation changes the
// floating-point summation order relative to the sequential generic
// versions; results may differ in the last bits, never in which elements
// contribute.

use num_traits::Float;
use wide::{f64x4, CmpEq};

/// Sum of non-NaN elements; 0 if none are present.
#[must_use]
pub fn nansum<T: Float>(a: &[T]) -> T {
    let mut asum = T::zero();
    for &ai in a {
        if !ai.is_nan() {
            asum = asum + ai;
        }
    }
    asum
}

/// Mean of non-NaN elements; NaN if none are present.
#[must_use]
pub fn nanmean<T: Float>(a: &[T]) -> T {
    let mut asum = T::zero();
    let mut cnt = 0usize;
    for &ai in a {
        if !ai.is_nan() {
            asum = asum + ai;
            cnt += 1;
        }
    }
    if cnt > 0 {
        asum / T::from(cnt).expect("non-NaN count is representable as a float")
    } else {
        T::nan()
    }
}

/// Sum and count of the non-NaN elements of an f64 slice, chunked.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn chunk_sum_count(a: &[f64]) -> (f64, usize) {
    let zero = f64x4::splat(0.0);
    let ones = f64x4::splat(1.0);
    let mut accv = zero;
    let mut cntv = zero;
    let mut i = 0usize;
    let limit4 = a.len() & !3;
    while i < limit4 {
        let v = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        // NaN lanes fail the self-equality test and are blended to zero
        let present = v.cmp_eq(v);
        accv += present.blend(v, zero);
        cntv += present.blend(ones, zero);
        i += 4;
    }
    let arr = accv.to_array();
    let mut asum = arr[0] + arr[1] + arr[2] + arr[3];
    let cnt_arr = cntv.to_array();
    let mut cnt = (cnt_arr[0] + cnt_arr[1] + cnt_arr[2] + cnt_arr[3]) as usize;
    while i < a.len() {
        let x = a[i];
        if !x.is_nan() {
            asum += x;
            cnt += 1;
        }
        i += 1;
    }
    (asum, cnt)
}

/// `nansum` for f64 with 4-lane chunked accumulation.
#[must_use]
pub fn nansum_f64(a: &[f64]) -> f64 {
    let zero = f64x4::splat(0.0);
    let mut accv = zero;
    let mut i = 0usize;
    let limit4 = a.len() & !3;
    while i < limit4 {
        let v = f64x4::from([a[i], a[i + 1], a[i + 2], a[i + 3]]);
        let present = v.cmp_eq(v);
        accv += present.blend(v, zero);
        i += 4;
    }
    let arr = accv.to_array();
    let mut asum = arr[0] + arr[1] + arr[2] + arr[3];
    while i < a.len() {
        let x = a[i];
        if !x.is_nan() {
            asum += x;
        }
        i += 1;
    }
    asum
}

/// `nanmean` for f64 with 4-lane chunked accumulation.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nanmean_f64(a: &[f64]) -> f64 {
    let (asum, cnt) = chunk_sum_count(a);
    if cnt > 0 {
        asum / cnt as f64
    } else {
        f64::NAN
    }
}
