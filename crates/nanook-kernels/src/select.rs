//! Selection engine: in-place NaN compaction and quickselect
//
// Both helpers mutate the buffer they are given, so median kernels hand
// them a private copy of the input. Neither is stable: `compact_nans`
// swaps elements inward from both ends and `select_kth` partitions in
// place, so the relative order of retained elements is not preserved.

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k for indices"
)]

use num_traits::Float;

/// Partition NaNs to the tail of `buf` and return the number of non-NaN
/// elements, which then occupy `buf[..n]`.
///
/// Two inward-scanning pointers: the left one looks for a NaN, the right
/// one for a number, and the pair is swapped. One pass, no extra storage,
/// order-disrupting.
pub fn compact_nans<T: Float>(buf: &mut [T]) -> usize {
    let mut i = 0usize;
    let mut j = buf.len();
    loop {
        while i < j && !buf[i].is_nan() {
            i += 1;
        }
        while i < j && buf[j - 1].is_nan() {
            j -= 1;
        }
        if i >= j {
            break;
        }
        // buf[i] is NaN, buf[j - 1] is not; they cannot be the same slot
        buf.swap(i, j - 1);
        i += 1;
        j -= 1;
    }
    i
}

/// Hoare-style quickselect: leave the k-th order statistic at `buf[k]`.
///
/// The pivot is read at the target index `k`; each round partitions the
/// current `[l, r]` window with two inward-scanning pointers and then
/// narrows to whichever side still contains `k`. The buffer ends up
/// partially partitioned, not sorted. Comparison against NaN is always
/// false, so callers must compact NaNs out first.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
pub fn select_kth<T: Float>(buf: &mut [T], k: usize) {
    debug_assert!(k < buf.len());
    // Signed indices: the scan pointers may legitimately cross the window
    // edges by one before the narrowing step clamps them back.
    let k = k as isize;
    let mut l: isize = 0;
    let mut r: isize = buf.len() as isize - 1;
    while l < r {
        let pivot = buf[k as usize];
        let mut i = l;
        let mut j = r;
        loop {
            while buf[i as usize] < pivot {
                i += 1;
            }
            while buf[j as usize] > pivot {
                j -= 1;
            }
            if i <= j {
                buf.swap(i as usize, j as usize);
                i += 1;
                j -= 1;
            }
            if i > j {
                break;
            }
        }
        if j < k {
            l = i;
        }
        if k < i {
            r = j;
        }
    }
}

/// Median of `buf`, selecting in place. NaN on empty input.
///
/// `k = n >> 1` is the lower-median index. Odd lengths take `buf[k]`
/// directly; even lengths average `buf[k]` with the largest element of the
/// strictly-smaller partition `buf[..k]`, found by one linear scan, which
/// equals the average of the two middle order statistics.
pub fn median_inplace<T: Float>(buf: &mut [T]) -> T {
    let n = buf.len();
    if n == 0 {
        return T::nan();
    }
    let k = n >> 1;
    select_kth(buf, k);
    if n & 1 == 1 {
        buf[k]
    } else {
        let mut lower = buf[0];
        for &x in &buf[1..k] {
            if x > lower {
                lower = x;
            }
        }
        (lower + buf[k]) / T::from(2.0).expect("2 is representable in every float dtype")
    }
}
