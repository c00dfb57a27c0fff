//! Extremum and arg-extremum reductions over non-NaN elements
//
// Two empty-input policies coexist for this kernel family. The plain
// functions are tolerant: they return NaN (extrema) or a -1 sentinel
// (arg-extrema) when the input is empty or entirely NaN, which is what
// callers that cannot tolerate errors in hot paths expect. The `_strict`
// variants fail with `Error::EmptyInput` instead. Pick one family and use
// it consistently; the axis dispatcher binds the tolerant one.

use nanook_core::Error;
use num_traits::Float;

const EMPTY_SLICE: &str = "attempt to reduce an empty slice";
const ALL_NAN: &str = "All-NaN slice encountered";

/// Maximum of non-NaN elements; NaN when the input is empty or all NaN.
///
/// Single forward pass with a found-anything flag. The `>=` comparison
/// ensures a slice of `-inf` values still counts as found.
#[must_use]
pub fn nanmax<T: Float>(a: &[T]) -> T {
    let mut amax = T::neg_infinity();
    let mut found = false;
    for &ai in a {
        if ai >= amax {
            amax = ai;
            found = true;
        }
    }
    if found {
        amax
    } else {
        T::nan()
    }
}

/// Minimum of non-NaN elements; NaN when the input is empty or all NaN.
#[must_use]
pub fn nanmin<T: Float>(a: &[T]) -> T {
    let mut amin = T::infinity();
    let mut found = false;
    for &ai in a {
        if ai <= amin {
            amin = ai;
            found = true;
        }
    }
    if found {
        amin
    } else {
        T::nan()
    }
}

/// Strict-policy `nanmax`: fails instead of returning NaN.
pub fn nanmax_strict<T: Float>(a: &[T]) -> Result<T, Error> {
    if a.is_empty() {
        return Err(Error::EmptyInput(EMPTY_SLICE));
    }
    let amax = nanmax(a);
    if amax.is_nan() {
        Err(Error::EmptyInput(ALL_NAN))
    } else {
        Ok(amax)
    }
}

/// Strict-policy `nanmin`: fails instead of returning NaN.
pub fn nanmin_strict<T: Float>(a: &[T]) -> Result<T, Error> {
    if a.is_empty() {
        return Err(Error::EmptyInput(EMPTY_SLICE));
    }
    let amin = nanmin(a);
    if amin.is_nan() {
        Err(Error::EmptyInput(ALL_NAN))
    } else {
        Ok(amin)
    }
}

/// Index of the maximum non-NaN element, -1 when nothing is found.
///
/// The scan starts from an unbounded extremum with a strict `>` comparison,
/// so an input whose only finite content is `-inf` leaves the sentinel in
/// place; a second linear pass then resolves that case by matching the
/// initial extremum exactly. Empty and all-NaN inputs keep the -1 sentinel.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn nanargmax<T: Float>(a: &[T]) -> i64 {
    let mut amax = T::neg_infinity();
    let mut idx: i64 = -1;
    for (i, &ai) in a.iter().enumerate() {
        if ai > amax {
            amax = ai;
            idx = i as i64;
        }
    }
    if idx == -1 {
        for (i, &ai) in a.iter().enumerate() {
            if ai == amax {
                idx = i as i64;
                break;
            }
        }
    }
    idx
}

/// Index of the minimum non-NaN element, -1 when nothing is found.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn nanargmin<T: Float>(a: &[T]) -> i64 {
    let mut amin = T::infinity();
    let mut idx: i64 = -1;
    for (i, &ai) in a.iter().enumerate() {
        if ai < amin {
            amin = ai;
            idx = i as i64;
        }
    }
    if idx == -1 {
        for (i, &ai) in a.iter().enumerate() {
            if ai == amin {
                idx = i as i64;
                break;
            }
        }
    }
    idx
}

/// Strict-policy `nanargmax`: fails instead of returning the sentinel.
pub fn nanargmax_strict<T: Float>(a: &[T]) -> Result<i64, Error> {
    if a.is_empty() {
        return Err(Error::EmptyInput(EMPTY_SLICE));
    }
    let idx = nanargmax(a);
    if idx == -1 {
        Err(Error::EmptyInput(ALL_NAN))
    } else {
        Ok(idx)
    }
}

/// Strict-policy `nanargmin`: fails instead of returning the sentinel.
pub fn nanargmin_strict<T: Float>(a: &[T]) -> Result<i64, Error> {
    if a.is_empty() {
        return Err(Error::EmptyInput(EMPTY_SLICE));
    }
    let idx = nanargmin(a);
    if idx == -1 {
        Err(Error::EmptyInput(ALL_NAN))
    } else {
        Ok(idx)
    }
}
